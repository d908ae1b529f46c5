use chrono::{DateTime, NaiveDate, Utc};
use rowmap::Entity;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "orders", pk = "id")]
pub struct Order {
    #[orm(column = "id", tag = "uuid")]
    pub id: Option<Uuid>,
    #[orm(column = "type", tag = "string")]
    pub kind: String,
    #[orm(column = "name", tag = "string")]
    pub name: String,
    #[orm(column = "ppu", tag = "float64")]
    pub ppu: f64,
    #[orm(column = "status", tag = "int32")]
    pub status: i32,
    #[orm(column = "enable", tag = "bool")]
    pub enable: bool,
    #[orm(column = "order_date", tag = "date")]
    pub order_date: Option<NaiveDate>,
    #[orm(column = "created_at", tag = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[orm(column = "chef_id", tag = "zerouuid")]
    pub chef_id: Uuid,

    #[orm(fk = "fk_field1:chef_id,fk_field2:id")]
    pub chef: Option<Chef>,
    #[orm(fk = "fk_field1:id,fk_field2:order_id")]
    pub toppings: Vec<Topping>,
    #[orm(fk = "fk_field1:id,fk_field2:order_id")]
    pub batters: Vec<Batter>,
}

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "toppings", pk = "id")]
pub struct Topping {
    #[orm(column = "id", tag = "int32")]
    pub id: i32,
    #[orm(column = "type", tag = "string")]
    pub kind: String,
    #[orm(column = "order_id", tag = "uuid")]
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "batters", pk = "id")]
pub struct Batter {
    #[orm(column = "id", tag = "string")]
    pub id: String,
    #[orm(column = "type", tag = "string")]
    pub kind: String,
    #[orm(column = "order_id", tag = "uuid")]
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "chefs", pk = "id")]
pub struct Chef {
    #[orm(column = "id", tag = "uuid")]
    pub id: Option<Uuid>,
    #[orm(column = "name", tag = "string")]
    pub name: String,
}

// Two-level graph: authors -> books -> chapters.

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "authors", pk = "id")]
pub struct Author {
    #[orm(column = "id", tag = "uuid")]
    pub id: Option<Uuid>,
    #[orm(column = "name", tag = "string")]
    pub name: String,

    #[orm(fk = "fk_field1:id,fk_field2:author_id")]
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "books", pk = "id")]
pub struct Book {
    #[orm(column = "id", tag = "int64")]
    pub id: i64,
    #[orm(column = "title", tag = "string")]
    pub title: String,
    #[orm(column = "author_id", tag = "uuid")]
    pub author_id: Option<Uuid>,

    #[orm(fk = "fk_field1:id,fk_field2:book_id")]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Default, Entity)]
#[orm(table = "chapters", pk = "id")]
pub struct Chapter {
    #[orm(column = "id", tag = "int64")]
    pub id: i64,
    #[orm(column = "book_id", tag = "int64")]
    pub book_id: i64,
    #[orm(column = "title", tag = "string")]
    pub title: String,
}
