use flatgeobuf_convert::{Column, ColumnType, Props, Result, Schema, SchemaView};

#[test]
fn linear_lookup_below_threshold() {
    let schema = Schema::new(vec![
        Column::new("a", ColumnType::Int),
        Column::new("b", ColumnType::String),
        Column::new("c", ColumnType::Double),
    ]);
    assert_eq!(schema.index("a"), Some(0));
    assert_eq!(schema.index("c"), Some(2));
    assert_eq!(schema.index("missing"), None);
}

#[test]
fn map_lookup_above_threshold() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let schema = Schema::new(
        names
            .iter()
            .map(|name| Column::new(*name, ColumnType::Int))
            .collect(),
    );
    for (index, name) in names.iter().enumerate() {
        assert_eq!(schema.index(name), Some(index));
    }
    assert_eq!(schema.index("missing"), None);
}

#[test]
fn duplicate_name_resolves_to_last_occurrence() {
    let mut cols: Vec<_> = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .map(|name| Column::new(*name, ColumnType::Int))
        .collect();
    cols.push(Column::new("b", ColumnType::Double));
    let schema = Schema::new(cols);
    assert_eq!(schema.index("b"), Some(6));
}

#[test]
fn out_of_range_lookups_return_defaults() {
    let schema = Schema::new(vec![Column::new("a", ColumnType::Long)]);
    assert_eq!(schema.name(0), "a");
    assert_eq!(schema.name(5), "");
    assert_eq!(schema.column_type(0), ColumnType::Long);
    assert_eq!(schema.column_type(5), ColumnType::Byte);
    assert!(schema.column(5).is_none());
}

#[test]
fn schema_view_capability() -> Result<()> {
    let schema = Schema::new(vec![
        Column::new("name", ColumnType::String),
        Column::new("age", ColumnType::Int),
    ]);
    let view: &dyn SchemaView = &schema;
    assert_eq!(view.column_count(), 2);
    let info = view.column_info(1)?.expect("column in range");
    assert_eq!(info.name, "age");
    assert_eq!(info.type_, ColumnType::Int);
    assert_eq!(view.column_info(9)?, None);
    assert_eq!(view.column_name(0)?, Some("name".to_string()));
    assert_eq!(view.index_of("age")?, Some(1));
    assert_eq!(view.index_of("missing")?, None);
    Ok(())
}

#[test]
fn named_access_over_a_wide_schema() -> Result<()> {
    let schema = Schema::new(
        ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|name| Column::new(*name, ColumnType::Double))
            .collect(),
    );
    let mut props = Props::new(&schema);
    props.set_double_by_name("f", 6.0)?;
    props.set_double_by_name("a", 1.0)?;
    assert_eq!(props.get_double_by_name("f")?, 6.0);
    assert_eq!(props.get_double(0)?, 1.0);
    assert!(props.has_by_name("a"));
    assert!(!props.has_by_name("g"));
    assert!(props.delete_by_name("f"));
    assert!(!props.has_by_name("f"));
    Ok(())
}
