mod common;

use common::entities::Order;
use rowmap::{Entity, build_selector};

#[test]
fn selector_projects_scalar_columns_in_declaration_order() {
    assert_eq!(
        build_selector::<Order>(),
        r#"orders.id "orders.id",orders.type "orders.type",orders.name "orders.name",orders.ppu "orders.ppu",orders.status "orders.status",orders.enable "orders.enable",orders.order_date "orders.order_date",orders.created_at "orders.created_at",orders.chef_id "orders.chef_id""#
    );
}

#[test]
fn selector_skips_relation_and_unbacked_fields() {
    #[derive(Debug, Clone, Default, Entity)]
    #[orm(table = "notes", pk = "id")]
    #[allow(dead_code)]
    struct Note {
        #[orm(column = "id", tag = "int64")]
        id: i64,
        #[orm(column = "-")]
        scratch: String,
        #[orm(column = "body", tag = "string")]
        body: String,

        #[orm(fk = "fk_field1:id,fk_field2:note_id")]
        tags: Vec<Tag>,
    }

    #[derive(Debug, Clone, Default, Entity)]
    #[orm(table = "tags", pk = "id")]
    #[allow(dead_code)]
    struct Tag {
        #[orm(column = "id", tag = "int64")]
        id: i64,
        #[orm(column = "note_id", tag = "int64")]
        note_id: i64,
    }

    assert_eq!(
        build_selector::<Note>(),
        r#"notes.id "notes.id",notes.body "notes.body""#
    );
    assert_eq!(
        build_selector::<Tag>(),
        r#"tags.id "tags.id",tags.note_id "tags.note_id""#
    );
}
