mod common;

use common::entities::{Author, Order};
use common::{ORDER_COLUMNS, id, int, order_row, text};
use rowmap::{MapperOption, MemoryRows, Value, map_rows};
use uuid::Uuid;

fn topping_columns() -> Vec<&'static str> {
    let mut columns = ORDER_COLUMNS.to_vec();
    columns.extend(["toppings.id", "toppings.type", "toppings.order_id"]);
    columns
}

fn with_topping(mut row: Vec<Value>, topping_id: i64, kind: &str, order_id: &Uuid) -> Vec<Value> {
    row.extend([int(topping_id), text(kind), id(order_id)]);
    row
}

fn without_topping(mut row: Vec<Value>) -> Vec<Value> {
    row.extend([Value::Null, Value::Null, Value::Null]);
    row
}

#[tokio::test]
async fn plural_relation_binds_per_parent() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();

    let rows = MemoryRows::new(
        topping_columns(),
        vec![
            without_topping(order_row(&u1, "A", None)),
            with_topping(order_row(&u1, "A", None), 1, "cheese", &u1),
            with_topping(order_row(&u1, "A", None), 2, "ham", &u1),
            without_topping(order_row(&u2, "B", None)),
        ],
    );

    let mapper = map_rows::<Order, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");

    assert_eq!(mapper.row_count(), 4);
    let orders = mapper.into_data();
    assert_eq!(orders.len(), 2);

    assert_eq!(orders[0].name, "A");
    assert_eq!(orders[0].toppings.len(), 2);
    assert_eq!(orders[0].toppings[0].id, 1);
    assert_eq!(orders[0].toppings[0].kind, "cheese");
    assert_eq!(orders[0].toppings[1].id, 2);
    assert_eq!(orders[0].toppings[1].kind, "ham");

    assert_eq!(orders[1].name, "B");
    assert!(orders[1].toppings.is_empty());
}

#[tokio::test]
async fn two_plural_relations_stay_independent() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();

    let mut columns = topping_columns();
    columns.extend(["batters.id", "batters.type", "batters.order_id"]);

    let pad = |mut row: Vec<Value>| -> Vec<Value> {
        row.extend([Value::Null, Value::Null, Value::Null]);
        row
    };
    let with_batter = |mut row: Vec<Value>, batter_id: &str, kind: &str, order: &Uuid| {
        row.extend([text(batter_id), text(kind), id(order)]);
        row
    };

    let rows = MemoryRows::new(
        columns,
        vec![
            pad(without_topping(order_row(&u1, "A", None))),
            pad(with_topping(order_row(&u1, "A", None), 1, "cheese", &u1)),
            with_batter(without_topping(order_row(&u1, "A", None)), "b1", "regular", &u1),
            with_batter(without_topping(order_row(&u1, "A", None)), "b2", "chocolate", &u1),
            pad(without_topping(order_row(&u2, "B", None))),
        ],
    );

    let mapper = map_rows::<Order, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");

    let orders = mapper.into_data();
    assert_eq!(orders.len(), 2);

    assert_eq!(orders[0].toppings.len(), 1);
    assert_eq!(orders[0].toppings[0].kind, "cheese");
    assert_eq!(orders[0].batters.len(), 2);
    assert_eq!(orders[0].batters[0].id, "b1");
    assert_eq!(orders[0].batters[1].id, "b2");

    assert!(orders[1].toppings.is_empty());
    assert!(orders[1].batters.is_empty());
}

#[tokio::test]
async fn singular_relation_takes_first_match() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    let c1 = Uuid::new_v4();

    let mut columns = ORDER_COLUMNS.to_vec();
    columns.extend(["chefs.id", "chefs.name"]);

    let mut row1 = order_row(&u1, "A", Some(&c1));
    row1.extend([id(&c1), text("Gordon")]);
    let mut row2 = order_row(&u2, "B", None);
    row2.extend([Value::Null, Value::Null]);

    let rows = MemoryRows::new(columns, vec![row1, row2]);

    let mapper = map_rows::<Order, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");

    let orders = mapper.into_data();
    assert_eq!(orders.len(), 2);

    let chef = orders[0].chef.as_ref().expect("chef should be bound");
    assert_eq!(chef.id, Some(c1));
    assert_eq!(chef.name, "Gordon");

    assert!(orders[1].chef.is_none());
}

#[tokio::test]
async fn children_do_not_leak_across_parents() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();

    let rows = MemoryRows::new(
        topping_columns(),
        vec![
            with_topping(order_row(&u1, "A", None), 1, "cheese", &u1),
            with_topping(order_row(&u2, "B", None), 1, "cheese", &u2),
            with_topping(order_row(&u2, "B", None), 2, "ham", &u2),
        ],
    );

    let mapper = map_rows::<Order, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");

    let orders = mapper.into_data();
    assert_eq!(orders.len(), 2);

    // topping id 1 appears under both parents: the dedup key is extended
    // by the child-side join fields, so each parent keeps its own copy
    assert_eq!(orders[0].toppings.len(), 1);
    assert_eq!(orders[0].toppings[0].order_id, Some(u1));
    assert_eq!(orders[1].toppings.len(), 2);
    assert_eq!(orders[1].toppings[0].order_id, Some(u2));
}

#[tokio::test]
async fn reordered_rows_keep_the_same_multiset() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();

    let rows = MemoryRows::new(
        topping_columns(),
        vec![
            with_topping(order_row(&u2, "B", None), 3, "bacon", &u2),
            with_topping(order_row(&u1, "A", None), 1, "cheese", &u1),
            with_topping(order_row(&u2, "B", None), 4, "onion", &u2),
            with_topping(order_row(&u1, "A", None), 2, "ham", &u1),
        ],
    );

    let mapper = map_rows::<Order, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");

    let orders = mapper.into_data();
    // parent order follows first occurrence in the stream
    assert_eq!(orders[0].name, "B");
    assert_eq!(orders[1].name, "A");
    // children follow their own first-occurrence order
    let kinds: Vec<&str> = orders[0].toppings.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["bacon", "onion"]);
    let kinds: Vec<&str> = orders[1].toppings.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["cheese", "ham"]);
}

#[tokio::test]
async fn grandchildren_bind_through_two_levels() {
    let a1 = Uuid::new_v4();
    let a2 = Uuid::new_v4();

    let columns = vec![
        "authors.id",
        "authors.name",
        "books.id",
        "books.title",
        "books.author_id",
        "chapters.id",
        "chapters.book_id",
        "chapters.title",
    ];

    let row = |author: &Uuid, name: &str, book: Option<(i64, &str)>, chapter: Option<(i64, i64, &str)>| {
        let mut values = vec![id(author), text(name)];
        match book {
            Some((book_id, title)) => values.extend([int(book_id), text(title), id(author)]),
            None => values.extend([Value::Null, Value::Null, Value::Null]),
        }
        match chapter {
            Some((chapter_id, book_id, title)) => {
                values.extend([int(chapter_id), int(book_id), text(title)]);
            }
            None => values.extend([Value::Null, Value::Null, Value::Null]),
        }
        values
    };

    let rows = MemoryRows::new(
        columns,
        vec![
            row(&a1, "Ursula", Some((1, "Earthsea")), Some((10, 1, "Warriors"))),
            row(&a1, "Ursula", Some((1, "Earthsea")), Some((11, 1, "Shadow"))),
            row(&a1, "Ursula", Some((2, "Lathe")), Some((20, 2, "Dreams"))),
            row(&a2, "Stanislaw", Some((3, "Solaris")), None),
            row(&a2, "Stanislaw", None, None),
        ],
    );

    let mapper = map_rows::<Author, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");

    let authors = mapper.into_data();
    assert_eq!(authors.len(), 2);

    let ursula = &authors[0];
    assert_eq!(ursula.books.len(), 2);
    assert_eq!(ursula.books[0].title, "Earthsea");
    assert_eq!(ursula.books[0].chapters.len(), 2);
    assert_eq!(ursula.books[0].chapters[0].title, "Warriors");
    assert_eq!(ursula.books[0].chapters[1].title, "Shadow");
    assert_eq!(ursula.books[1].title, "Lathe");
    assert_eq!(ursula.books[1].chapters.len(), 1);
    assert_eq!(ursula.books[1].chapters[0].title, "Dreams");

    let stanislaw = &authors[1];
    assert_eq!(stanislaw.books.len(), 1);
    assert_eq!(stanislaw.books[0].title, "Solaris");
    assert!(stanislaw.books[0].chapters.is_empty());
}
