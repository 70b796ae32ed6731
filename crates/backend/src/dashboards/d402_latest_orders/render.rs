use contracts::dashboards::d402_latest_orders::{LatestOrdersSnapshot, OrderRow};
use std::path::Path;
use thiserror::Error;

use super::service::GOODS_SEPARATOR;

pub const PLACEHOLDER_DATE: &str = "{{DATE}}";
pub const PLACEHOLDER_ORDER_COUNT: &str = "{{ORDER_COUNT}}";
pub const PLACEHOLDER_TABLE_ROWS: &str = "{{TABLE_ROWS}}";

/// Страница, когда в кеше нет заказов
pub const NO_ORDERS_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Latest Orders</title>
    <style>
      body { font-family: Arial, sans-serif; margin: 40px; }
      h1 { color: #333; }
    </style>
  </head>
  <body>
    <h1>Latest Orders</h1>
    <p>No orders found in cache.</p>
  </body>
</html>
"#;

/// Ошибки построения HTML-страницы
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {path} has no {placeholder} placeholder")]
    MissingPlaceholder { path: String, placeholder: String },
}

/// Экранирует текст ячейки для вставки в HTML
pub fn escape_cell(value: &str) -> String {
    ammonia::clean_text(value)
}

/// Экранирует многострочное значение, сохраняя переносы как <br>
pub fn escape_multiline(value: &str) -> String {
    value
        .split(GOODS_SEPARATOR)
        .map(escape_cell)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// HTML-разметка строк таблицы
pub fn render_rows(rows: &[OrderRow]) -> String {
    let mut html = String::new();
    for row in rows {
        html.push_str("        <tr>\n");
        html.push_str(&format!("          <td>{}</td>\n", escape_cell(&row.name)));
        html.push_str(&format!(
            "          <td class=\"channel\">{}</td>\n",
            escape_cell(&row.channel)
        ));
        html.push_str(&format!(
            "          <td class=\"goods\">{}</td>\n",
            escape_multiline(&row.goods)
        ));
        html.push_str(&format!(
            "          <td class=\"amount\">{}</td>\n",
            escape_cell(&row.amount)
        ));
        html.push_str(&format!(
            "          <td class=\"address\">{}</td>\n",
            escape_cell(&row.address)
        ));
        html.push_str("        </tr>\n");
    }
    html
}

/// Подстановка значений в шаблон за один проход.
///
/// Вставленные значения повторно не сканируются, поэтому текст заказа,
/// похожий на плейсхолдер, остается как есть.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                result.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                result.push_str("{{");
                rest = &tail[2..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Собирает страницу дашборда.
///
/// Пустой набор строк дает фиксированную страницу "нет заказов".
/// Дата подставляется во все вхождения плейсхолдера (title и заголовок).
pub fn render(template: &str, date: &str, row_count: usize, rows: &[OrderRow]) -> String {
    if rows.is_empty() {
        return NO_ORDERS_PAGE.to_string();
    }

    let date = escape_cell(date);
    let count = row_count.to_string();
    let table_rows = render_rows(rows);

    fill_template(
        template,
        &[
            (PLACEHOLDER_DATE, date.as_str()),
            (PLACEHOLDER_ORDER_COUNT, count.as_str()),
            (PLACEHOLDER_TABLE_ROWS, table_rows.as_str()),
        ],
    )
}

/// Читает шаблон с диска (на каждый запрос)
pub async fn load_template(path: &Path) -> Result<String, RenderError> {
    let template = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RenderError::Template {
            path: path.display().to_string(),
            source,
        })?;

    if !template.contains(PLACEHOLDER_TABLE_ROWS) {
        return Err(RenderError::MissingPlaceholder {
            path: path.display().to_string(),
            placeholder: PLACEHOLDER_TABLE_ROWS.to_string(),
        });
    }

    Ok(template)
}

/// Страница дашборда для опубликованного набора данных
pub async fn render_snapshot(
    template_path: &Path,
    snapshot: &LatestOrdersSnapshot,
) -> Result<String, RenderError> {
    if snapshot.rows.is_empty() {
        return Ok(NO_ORDERS_PAGE.to_string());
    }

    let template = load_template(template_path).await?;
    Ok(render(
        &template,
        &snapshot.date,
        snapshot.row_count(),
        &snapshot.rows,
    ))
}

/// Страница ошибки для ответа 500
pub fn render_error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Error</title></head>
  <body>
    <h1>Error</h1>
    <p>Failed to load orders: {}</p>
  </body>
</html>
"#,
        escape_cell(message)
    )
}
