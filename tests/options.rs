mod common;

use common::entities::{Order, Topping};
use common::{ORDER_COLUMNS, id, int, order_row, text};
use rowmap::{MapperOption, MemoryRows, Value, map_rows};
use uuid::Uuid;

#[tokio::test]
async fn disabled_binding_materializes_root_only() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    let c1 = Uuid::new_v4();

    let mut columns = ORDER_COLUMNS.to_vec();
    columns.extend([
        "toppings.id",
        "toppings.type",
        "toppings.order_id",
        "chefs.id",
        "chefs.name",
    ]);

    let mut row1 = order_row(&u1, "A", Some(&c1));
    row1.extend([int(1), text("cheese"), id(&u1), id(&c1), text("Gordon")]);
    let mut row2 = order_row(&u2, "B", None);
    row2.extend([int(2), text("ham"), id(&u2), Value::Null, Value::Null]);

    let rows = MemoryRows::new(columns, vec![row1, row2]);

    let mapper = map_rows::<Order, _>(rows, MapperOption::new().disable_binding())
        .await
        .expect("mapping failed");

    let orders = mapper.into_data();
    assert_eq!(orders.len(), 2);
    for order in &orders {
        // joined data is present in the rows but never attached
        assert!(order.toppings.is_empty());
        assert!(order.batters.is_empty());
        assert!(order.chef.is_none());
    }
}

#[tokio::test]
async fn pk_override_replaces_the_annotated_key() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();

    let rows = MemoryRows::new(
        ORDER_COLUMNS.to_vec(),
        vec![
            order_row(&u1, "same-name", None),
            order_row(&u2, "same-name", None),
        ],
    );

    // dedup on the name field instead of the id: the second row collapses
    let options = MapperOption::new()
        .disable_binding()
        .override_pk::<Order>(&["name"]);
    let mapper = map_rows::<Order, _>(rows, options)
        .await
        .expect("mapping failed");

    assert_eq!(mapper.row_count(), 2);
    assert_eq!(mapper.data().len(), 1);
    assert_eq!(mapper.data()[0].id, Some(u1));
}

#[tokio::test]
async fn zero_pk_rows_are_dropped_by_default() {
    let u1 = Uuid::new_v4();

    let columns = vec!["toppings.id", "toppings.type", "toppings.order_id"];
    let rows = MemoryRows::new(
        columns.clone(),
        vec![
            vec![int(0), text("zero"), id(&u1)],
            vec![int(1), text("one"), id(&u1)],
        ],
    );

    let mapper = map_rows::<Topping, _>(rows, MapperOption::new())
        .await
        .expect("mapping failed");
    assert_eq!(mapper.data().len(), 1);
    assert_eq!(mapper.data()[0].id, 1);

    // with the policy relaxed, the zero-keyed row is a legitimate record
    let rows = MemoryRows::new(
        columns,
        vec![
            vec![int(0), text("zero"), id(&u1)],
            vec![int(1), text("one"), id(&u1)],
        ],
    );
    let mapper = map_rows::<Topping, _>(rows, MapperOption::new().allow_zero_pk())
        .await
        .expect("mapping failed");
    assert_eq!(mapper.data().len(), 2);
    assert_eq!(mapper.data()[0].id, 0);
    assert_eq!(mapper.data()[0].kind, "zero");
}
