pub mod a025_moysklad_order;
