/// Значение-заглушка для отсутствующих данных
pub const NOT_AVAILABLE: &str = "N/A";

/// Сумма МойСклад делится на 10 000 до рублей, то есть на 100 до копеек
const SUM_PER_KOPECK: f64 = 100.0;

/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    group_digits(n as u128, '.')
}

/// Форматирует сумму заказа МойСклад в рублях по русской локали.
///
/// Сумма делится на 10 000 и округляется до копеек (половина от нуля).
/// Разделитель триад: неразрывный пробел, десятичный: запятая,
/// всегда два знака после запятой: `150000` -> `"15,00"`.
/// Отсутствующая или нечисловая сумма -> `"N/A"`.
pub fn format_amount(sum: Option<f64>) -> String {
    let sum = match sum {
        Some(s) if s.is_finite() => s,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let kopecks = (sum / SUM_PER_KOPECK).round();
    let negative = kopecks < 0.0;
    let kopecks = kopecks.abs() as u128;

    let rubles = group_digits(kopecks / 100, '\u{a0}');
    let cents = kopecks % 100;

    if negative && kopecks > 0 {
        format!("-{},{:02}", rubles, cents)
    } else {
        format!("{},{:02}", rubles, cents)
    }
}

/// Количество без дробной части, если оно целое; дробное через запятую,
/// как в суммах
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        quantity.to_string().replace('.', ",")
    }
}

fn group_digits(n: u128, separator: char) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Some(150000.0)), "15,00");
        assert_eq!(format_amount(Some(0.0)), "0,00");
        assert_eq!(format_amount(Some(12345.0)), "1,23");
        assert_eq!(format_amount(Some(12350.0)), "1,24");
        assert_eq!(format_amount(Some(1234567890.0)), "123\u{a0}456,79");
        assert_eq!(format_amount(Some(10_000_000_000.0)), "1\u{a0}000\u{a0}000,00");
        assert_eq!(format_amount(Some(-250000.0)), "-25,00");
    }

    #[test]
    fn test_format_amount_missing() {
        assert_eq!(format_amount(None), "N/A");
        assert_eq!(format_amount(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.5), "1,5");
        assert_eq!(format_quantity(0.25), "0,25");
        assert_eq!(format_quantity(-3.0), "-3");
    }
}
