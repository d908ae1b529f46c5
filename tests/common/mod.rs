pub mod entities;

use rowmap::Value;
use uuid::Uuid;

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn int(i: i64) -> Value {
    Value::Int(i)
}

pub fn float(f: f64) -> Value {
    Value::Float(f)
}

pub fn id(u: &Uuid) -> Value {
    Value::Uuid(*u)
}

/// Standard order columns shared by the mapper scenarios.
pub const ORDER_COLUMNS: [&str; 9] = [
    "orders.id",
    "orders.type",
    "orders.name",
    "orders.ppu",
    "orders.status",
    "orders.enable",
    "orders.order_date",
    "orders.created_at",
    "orders.chef_id",
];

/// One fully populated order row without any joined columns.
pub fn order_row(order_id: &Uuid, name: &str, chef_id: Option<&Uuid>) -> Vec<Value> {
    vec![
        id(order_id),
        text("donut"),
        text(name),
        float(2.5),
        int(1),
        Value::Bool(true),
        text("2023-04-05"),
        text("2023-04-05 06:07:08"),
        chef_id.map(id).unwrap_or(Value::Null),
    ]
}
