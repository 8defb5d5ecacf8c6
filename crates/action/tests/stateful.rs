//! Stateful mode: previous result in, `values` out.

use std::sync::Arc;

use craft_action::prelude::*;
use craft_action::{ErrorKind, RawArg, ResultShape};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn counter() -> CraftedAction {
    ActionClient::bare()
        .action()
        .name("counter")
        .stateful()
        .input(
            Schema::object().field(
                "step",
                Schema::string()
                    .pattern("^[0-9]+$", "Step must be a number")
                    .unwrap(),
            ),
        )
        .handler(|ctx| async move {
            let previous = ctx
                .prev_data()
                .and_then(|data| data["count"].as_u64())
                .unwrap_or(0);
            let step: u64 = ctx.input()["step"]
                .as_str()
                .and_then(|step| step.parse().ok())
                .unwrap_or(1);
            Ok(HandlerOutput::ok(json!({ "count": previous + step })))
        })
}

#[tokio::test]
async fn resubmission_builds_on_the_previous_result() {
    let action = counter();
    assert_eq!(action.shape(), ResultShape::Stateful);

    let initial = action.initial_state();
    assert_eq!(
        initial.to_json(),
        json!({
            "success": false,
            "error": {"type": "INITIAL_STATE", "message": "Action has not been executed yet"},
            "id": action.id().to_string()
        })
    );

    let first = action
        .call_stateful(&initial, FormData::new().text("step", "2"))
        .await;
    assert_eq!(
        first.to_json(),
        json!({
            "success": true,
            "data": {"count": 2},
            "values": {"step": "2"},
            "id": action.id().to_string()
        })
    );

    let second = action
        .call_stateful(&first, FormData::new().text("step", "3"))
        .await;
    assert_eq!(second.data(), Some(&json!({"count": 5})));

    let third = action
        .call_stateful(second.to_json(), FormData::new().text("step", "10"))
        .await;
    assert_eq!(third.data(), Some(&json!({"count": 15})));
}

#[tokio::test]
async fn failed_validation_echoes_values_for_rerendering() {
    let action = counter();

    let result = action
        .call_stateful(
            action.initial_state(),
            FormData::new()
                .text("step", "two")
                .text("$ACTION_KEY", "k"),
        )
        .await;

    let wire = result.to_json();
    assert_eq!(wire["success"], false);
    assert_eq!(wire["error"]["type"], "INPUT_VALIDATION");
    assert_eq!(wire["error"]["issues"][0]["path"], json!(["step"]));
    assert_eq!(wire["values"], json!({"step": "two"}));
}

#[tokio::test]
async fn json_input_is_echoed_as_is() {
    let action = ActionClient::bare()
        .action()
        .stateful()
        .handler(|_ctx| async { Ok(HandlerOutput::ok(1)) });

    let result = action
        .call_stateful(action.initial_state(), json!({"tags": ["a", "b"]}))
        .await;

    assert_eq!(result.values(), Some(&json!({"tags": ["a", "b"]})));
}

#[tokio::test]
async fn files_are_echoed_by_name() {
    let action = ActionClient::bare()
        .action()
        .stateful()
        .handler(|ctx| async move { Ok(HandlerOutput::ok(ctx.input().clone())) });

    let form = FormData::new().text("title", "Report").file(
        "attachment",
        FileEntry {
            name: "q3.pdf".into(),
            content_type: "application/pdf".into(),
            size: 1024,
        },
    );
    let result = action.call_stateful(action.initial_state(), form).await;

    assert_eq!(
        result.values(),
        Some(&json!({"title": "Report", "attachment": "q3.pdf"}))
    );
    assert_eq!(
        result.data(),
        Some(&json!({
            "title": "Report",
            "attachment": {"name": "q3.pdf", "contentType": "application/pdf", "size": 1024}
        }))
    );
}

#[tokio::test]
async fn missing_previous_result_is_an_internal_fault() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let action = {
        let observed = Arc::clone(&observed);
        ActionClient::bare()
            .action()
            .stateful()
            .on_error(move |event| {
                observed.lock().push(event.error.kind());
                async { Ok(()) }
            })
            .handler(|_ctx| async { Ok(HandlerOutput::ok(1)) })
    };

    let empty = action.run(Vec::new()).await;
    let form_as_prev = action
        .run(vec![RawArg::Form(FormData::new()), RawArg::Json(Value::Null)])
        .await;

    assert_eq!(empty.error().and_then(ActionError::kind), Some(ErrorKind::Unhandled));
    assert_eq!(
        form_as_prev.error().and_then(ActionError::kind),
        Some(ErrorKind::Unhandled)
    );
    assert_eq!(
        *observed.lock(),
        vec![Some(ErrorKind::InternalLogic), Some(ErrorKind::InternalLogic)]
    );
}

#[tokio::test]
async fn bind_args_come_before_the_previous_result() {
    let action = ActionClient::bare()
        .action()
        .stateful()
        .bind_arg(Schema::string())
        .handler(|ctx| async move {
            Ok(HandlerOutput::ok(json!({
                "owner": ctx.bind_args()[0],
                "had_previous": ctx.prev_result().is_some(),
            })))
        });

    let result = action
        .run(vec![
            RawArg::Json(json!("ada")),
            RawArg::Json(action.initial_state().to_json()),
            RawArg::Json(json!({})),
        ])
        .await;

    assert_eq!(
        result.data(),
        Some(&json!({"owner": "ada", "had_previous": true}))
    );
}

#[tokio::test]
async fn non_stateful_results_never_carry_values() {
    let action = ActionClient::bare()
        .action()
        .handler(|_ctx| async { Ok(HandlerOutput::ok(1)) });

    let result = action.call(FormData::new().text("a", "b")).await;

    assert_eq!(result.values(), None);
    assert!(result.to_json().get("values").is_none());
}
