//! Tests for rule chain execution and the lineage it records.

use casewhen_engine::{CaseError, Dataset};
use casewhen_model::{
    CaseOptions, LogicalOperator, OutputValue, Predicate, RuleChain, RuleError, RuleExpression,
    ValueType,
};
use polars::prelude::*;
use serde_json::json;

fn people() -> Dataset {
    let data = DataFrame::new(vec![Column::new("age".into(), &[10i64, 25, 40])]).unwrap();
    Dataset::named(data, "people")
}

fn sales() -> Dataset {
    let data = DataFrame::new(vec![
        Column::new("region".into(), &["US", "US", "EU"]),
        Column::new("amount".into(), &[50i64, 150, 200]),
        Column::new("revenue".into(), &[Some(1.5f64), None, Some(9.0)]),
    ])
    .unwrap();
    Dataset::named(data, "sales")
}

fn text_values(dataset: &Dataset, name: &str) -> Vec<Option<String>> {
    dataset
        .data
        .column(name)
        .unwrap()
        .str()
        .unwrap()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some((*v).to_string())).collect()
}

#[test]
fn age_segments_follow_statement_order() {
    let mut dataset = people();
    let chain = RuleChain::new("minor")
        .named("segment")
        .when(RuleExpression::greater_than("age", 30i64), "senior")
        .when(RuleExpression::greater_than("age", 18i64), "adult");

    dataset.apply_case(&chain).unwrap();

    assert_eq!(
        text_values(&dataset, "segment"),
        some(&["minor", "adult", "senior"])
    );
    let records = dataset.lineage().records();
    assert_eq!(records.len(), chain.atomic_steps());
    assert_eq!(records[0].output, "senior");
    assert_eq!(records[1].output, "adult");
    assert_eq!(records[2].function, Predicate::IsNull);
    assert_eq!(records[2].input, "segment");
    assert_eq!(records[2].output, "minor");
    assert!(records.iter().all(|r| r.dataset.as_deref() == Some("people")));
    assert!(records.iter().all(|r| r.output_name == "segment"));
}

#[test]
fn and_condition_groups_its_operands() {
    let mut dataset = sales();
    let chain = RuleChain::new(false).named("flag").when(
        RuleExpression::and(vec![
            RuleExpression::equal("region", "US"),
            RuleExpression::greater_than("amount", 100i64),
        ]),
        true,
    );

    dataset.apply_case(&chain).unwrap();

    let flags: Vec<Option<bool>> = dataset
        .data
        .column("flag")
        .unwrap()
        .bool()
        .unwrap()
        .iter()
        .collect();
    assert_eq!(flags, vec![Some(false), Some(true), Some(false)]);

    let records = dataset.lineage().records();
    assert_eq!(records.len(), 4);
    for record in &records[..2] {
        assert_eq!(record.logical, Some(LogicalOperator::And));
        assert_eq!(record.group_id, Some(1));
        assert_eq!(record.output, "true");
    }
    assert_eq!(records[2].function, LogicalOperator::And);
    assert_eq!(records[2].input, "#1");
    assert_eq!(records[2].group_id, None);
    assert_eq!(records[2].output, "true");
    assert_eq!(records[3].group_id, None);
    assert_eq!(records[3].output, "false");
}

#[test]
fn empty_chain_fills_else_everywhere() {
    let mut dataset = people();
    let chain = RuleChain::new("default").named("label");

    let outcome = dataset.apply_case(&chain).unwrap();

    assert_eq!(outcome.else_rows, 3);
    assert_eq!(
        text_values(&dataset, "label"),
        some(&["default", "default", "default"])
    );
    let records = dataset.lineage().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].function, Predicate::IsNull);
    assert_eq!(records[0].output, "default");
    assert_eq!(records[0].criteria, None);
}

#[test]
fn unknown_operator_changes_nothing() {
    let mut dataset = people();
    let before = dataset.data.clone();

    let err = dataset
        .apply_case_json(&json!({
            "output_column_name": "segment",
            "statements": [[["xor", "age", 30], "senior"]],
            "else": "minor"
        }))
        .unwrap_err();

    assert!(matches!(
        err,
        CaseError::Rule(RuleError::UnknownOperator { ref name }) if name == "xor"
    ));
    assert!(dataset.data.equals(&before));
    assert!(dataset.lineage().is_empty());
}

#[test]
fn json_chain_matches_builder() {
    let mut from_json = people();
    from_json
        .apply_case_json(&json!({
            "output_column_name": "segment",
            "statements": [
                [["greater than", "age", 30], "senior"],
                [["greater than", "age", 18], "adult"]
            ],
            "else": "minor"
        }))
        .unwrap();

    let mut built = people();
    built
        .apply_case(
            &RuleChain::new("minor")
                .named("segment")
                .when(RuleExpression::greater_than("age", 30i64), "senior")
                .when(RuleExpression::greater_than("age", 18i64), "adult"),
        )
        .unwrap();

    assert!(from_json.data.equals(&built.data));
    assert_eq!(from_json.lineage(), built.lineage());
}

#[test]
fn column_outputs_copy_row_values() {
    let mut dataset = sales();
    let chain = RuleChain::new(0.0)
        .named("booked")
        .when(
            RuleExpression::not(RuleExpression::is_null("revenue")),
            OutputValue::column("revenue"),
        );

    let outcome = dataset.apply_case(&chain).unwrap();

    assert_eq!(outcome.statement_rows, vec![2]);
    assert_eq!(outcome.else_rows, 1);
    let booked: Vec<Option<f64>> = dataset
        .data
        .column("booked")
        .unwrap()
        .f64()
        .unwrap()
        .iter()
        .collect();
    assert_eq!(booked, vec![Some(1.5), Some(0.0), Some(9.0)]);

    let records = dataset.lineage().records();
    assert_eq!(records[0].input, "revenue");
    assert_eq!(records[1].function, Predicate::Not);
    assert_eq!(records[1].input, "is null(revenue)");
    assert!(records[..2].iter().all(|r| r.output == "revenue"));
}

#[test]
fn group_ids_increase_across_statements() {
    let mut dataset = sales();
    let chain = RuleChain::new("other")
        .named("bucket")
        .when(
            RuleExpression::and(vec![
                RuleExpression::equal("region", "US"),
                RuleExpression::or(vec![
                    RuleExpression::greater_than("amount", 100i64),
                    RuleExpression::is_null("revenue"),
                ]),
            ]),
            "us-large",
        )
        .when(
            RuleExpression::or(vec![
                RuleExpression::equal("region", "EU"),
                RuleExpression::lesser_than("amount", 60i64),
            ]),
            "eu-or-small",
        );

    dataset.apply_case(&chain).unwrap();

    assert_eq!(
        text_values(&dataset, "bucket"),
        some(&["eu-or-small", "us-large", "eu-or-small"])
    );
    let groups = dataset.lineage().groups();
    let ids: Vec<u32> = groups.iter().map(|g| g.group_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(groups[0].logical, Some(LogicalOperator::Or));
    assert_eq!(groups[1].logical, Some(LogicalOperator::And));
    assert_eq!(groups[2].records.len(), 2);
    let outer: Vec<String> = groups[1].records.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        outer,
        vec![
            "[sales] equal(region, US) and#2 -> bucket = us-large",
            "[sales] or(#1) and#2 -> bucket = us-large",
        ]
    );
    assert_eq!(
        dataset.lineage().len(),
        chain.atomic_steps() + chain.logical_steps()
    );
}

#[test]
fn declared_type_is_enforced() {
    let mut dataset = people();
    let chain = RuleChain::new("none")
        .named("score")
        .with_value_type(ValueType::Integer)
        .when(RuleExpression::greater_than("age", 18i64), 1i64);

    let err = dataset.apply_case(&chain).unwrap_err();

    assert!(matches!(err, CaseError::TypeMismatch { ref column, .. } if column == "score"));
    assert!(dataset.data.column("score").is_err());
}

#[test]
fn history_accumulates_over_chains() {
    let mut dataset = people();
    let adult = RuleChain::new(false)
        .named("adult")
        .when(RuleExpression::greater_than("age", 17i64), true);
    let label = RuleChain::new("minor")
        .named("label")
        .when(RuleExpression::equal("adult", true), "adult");

    dataset.apply_case(&adult).unwrap();
    dataset
        .apply_case_with(&label, &CaseOptions::strict())
        .unwrap();

    assert_eq!(
        text_values(&dataset, "label"),
        some(&["minor", "adult", "adult"])
    );
    assert_eq!(dataset.lineage().len(), 4);
    assert_eq!(dataset.lineage().batches().count(), 2);
    assert_eq!(dataset.lineage().for_output("label").count(), 2);
    assert!(dataset.lineage().groups().is_empty());
}
