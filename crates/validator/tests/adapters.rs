//! Integration tests for the adapter contract through the public API.

use std::sync::Arc;

use async_trait::async_trait;
use craft_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

/// Adapter that suspends before answering, like a uniqueness lookup.
struct ReservedNames(Vec<&'static str>);

#[async_trait]
impl ValidationAdapter for ReservedNames {
    async fn validate(&self, input: Value) -> Result<ValidationOutcome, AdapterError> {
        tokio::task::yield_now().await;
        let name = input
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("lookup needs a string"))?;
        if self.0.contains(&name) {
            Ok(ValidationOutcome::Invalid(vec![Issue::root("Name is taken")]))
        } else {
            Ok(ValidationOutcome::Valid(input))
        }
    }
}

#[tokio::test]
async fn async_adapter_behind_trait_object() {
    let adapter: Arc<dyn ValidationAdapter> = Arc::new(ReservedNames(vec!["admin"]));
    assert!(adapter.validate(json!("jane")).await.unwrap().is_valid());
    assert_eq!(
        adapter.validate(json!("admin")).await.unwrap().issues(),
        &[Issue::root("Name is taken")]
    );
    assert!(adapter.validate(json!(7)).await.is_err());
}

#[tokio::test]
async fn nested_schema_reports_full_paths() {
    let order = Schema::object().field(
        "lines",
        Schema::array(
            Schema::object()
                .field("sku", Schema::string().non_empty())
                .field("qty", Schema::integer().min(1.0)),
        )
        .min_items(1),
    );

    let outcome = order
        .validate(json!({"lines": [{"sku": "A1", "qty": 2}, {"sku": "", "qty": 0}]}))
        .await
        .unwrap();

    let issues = outcome.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(
        issues[0].path,
        vec![PathSegment::from("lines"), 1usize.into(), "sku".into()]
    );
    assert_eq!(issues[1].dotted_path(), "lines.1.qty");
}

proptest! {
    #[test]
    fn one_issue_per_missing_required_field(count in 1usize..12) {
        let schema = (0..count).fold(Schema::object(), |schema, i| {
            schema.field(format!("f{i}"), Schema::string())
        });
        let outcome = schema.parse(&json!({}));
        prop_assert_eq!(outcome.issues().len(), count);
        for (i, issue) in outcome.issues().iter().enumerate() {
            prop_assert_eq!(issue.dotted_path(), format!("f{i}"));
        }
    }
}
