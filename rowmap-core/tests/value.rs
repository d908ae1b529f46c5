use chrono::{NaiveDate, TimeZone, Utc};
use rowmap_core::{FromValue, IntoValue, Value};
use uuid::Uuid;

#[test]
fn numeric_text_casts() {
    assert_eq!(Value::Text(" 42 ".into()).to_i64(), Some(42));
    assert_eq!(Value::Text("4.8".into()).to_i64(), Some(4));
    assert_eq!(Value::Text("x".into()).to_i64(), None);
    assert_eq!(Value::Bool(true).to_i64(), Some(1));
    assert_eq!(Value::Null.to_i64(), None);
}

#[test]
fn bool_text_forms() {
    for (input, expected) in [
        ("1", true),
        ("t", true),
        ("TRUE", true),
        ("0", false),
        ("f", false),
    ] {
        assert_eq!(
            Value::Text(input.into()).to_bool(),
            Some(expected),
            "input {input}"
        );
    }
    assert_eq!(Value::Text("yes".into()).to_bool(), None);
}

#[test]
fn timestamp_text_layouts() {
    let expected = Utc
        .with_ymd_and_hms(2023, 4, 5, 6, 7, 8)
        .single()
        .expect("valid instant");
    for input in [
        "2023-04-05 06:07:08",
        "2023-04-05T06:07:08",
        "2023-04-05T06:07:08Z",
    ] {
        assert_eq!(
            Value::Text(input.into()).to_timestamp(),
            Some(expected),
            "layout {input}"
        );
    }
    assert_eq!(
        Value::Text("2023-04-05".into()).to_date(),
        NaiveDate::from_ymd_opt(2023, 4, 5)
    );
}

#[test]
fn option_round_trip() {
    let id = Uuid::new_v4();
    let some: Option<Uuid> = Some(id);
    let none: Option<Uuid> = None;

    assert_eq!(some.into_value(), Value::Uuid(id));
    assert_eq!(none.into_value(), Value::Null);
    assert_eq!(Option::<Uuid>::from_value(Value::Uuid(id)), Some(Some(id)));
    assert_eq!(Option::<Uuid>::from_value(Value::Null), Some(None));
    assert_eq!(Uuid::from_value(Value::Int(3)), None);
}
