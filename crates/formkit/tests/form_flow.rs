//! End-to-end exercise of the runtime: a catalog-style "edit product"
//! form with a combobox, a dynamic creator list, a failing submit, and
//! the notification raised by the page afterwards.

use formkit::prelude::*;
use formkit::{BeginSubmit, MemoryHandoff, RecordingFocus, drain_handoff, item_errors};
use serde_json::{Value, json};

fn product_schema() -> impl Schema {
    |values: &FormValues| {
        let mut issues = Vec::new();

        let name = values.get("name").and_then(Value::as_str).unwrap_or("");
        if name.len() < 3 {
            issues.push(Issue::at("name", "Must be at least 3 characters"));
        }

        if values
            .get("publisher")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
        {
            issues.push(Issue::at("publisher", "Select a publisher"));
        }

        let creators = values
            .get("creators")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if creators.is_empty() {
            issues.push(Issue::at("creators", "At least one creator is required"));
        }
        for (i, creator) in creators.iter().enumerate() {
            let role = creator.get("role").and_then(Value::as_str).unwrap_or("");
            if role.is_empty() {
                issues.push(Issue::new(
                    vec!["creators".into(), i.into(), "role".into()],
                    "Role is required",
                ));
            }
        }

        if issues.is_empty() {
            Ok(json!({
                "name": name,
                "publisher": values["publisher"].clone(),
                "creators": creators,
            }))
        } else {
            Err(issues)
        }
    }
}

fn publishers() -> Vec<ComboOption> {
    vec![
        ComboOption::new("bg", "Burger Games"),
        ComboOption::new("fs", "Fry Studios"),
    ]
}

#[test]
fn invalid_submit_collects_errors_and_focuses_first() {
    let focus = RecordingFocus::new();
    let mut store = FormStore::with_focus(product_schema(), FormValues::new(), focus.clone());
    store.set_value("name", json!("AB"));

    let mut handler_ran = false;
    let outcome = store.submit(|_| {
        handler_ran = true;
        Ok(())
    });

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert!(!handler_ran);
    assert_eq!(focus.requests(), vec!["name".to_string()]);
    assert!(store.field_errors("name").is_some());
    assert!(store.field_errors("publisher").is_some());
    assert!(store.field_errors("creators").is_some());
}

#[test]
fn fixing_fields_through_controllers_makes_submit_pass() {
    let mut store = FormStore::new(product_schema(), FormValues::new());
    store.set_value("name", json!("Burger Quest"));

    // Pick a publisher through the combobox.
    let mut publisher = ComboboxState::new(&store, "publisher", publishers());
    publisher.focus();
    for c in "fry".chars() {
        publisher.handle_key(Key::Char(c), &mut store);
    }
    publisher.handle_key(Key::ArrowDown, &mut store);
    let event = publisher.handle_key(Key::Enter, &mut store);
    assert_eq!(event, ComboboxEvent::Committed("fs".to_string()));

    // Add a creator and fill its role.
    let mut template = formkit::ArrayItem::new();
    template.insert("role".to_string(), json!(""));
    let mut creators = ArrayFieldState::new(&store, "creators", template);
    creators.add(&mut store);
    creators.update_item(0, "role", json!("designer"), &mut store);

    let mut parsed = None;
    let outcome = store.submit(|v| {
        parsed = Some(v.clone());
        Ok(())
    });
    assert_eq!(outcome, SubmitOutcome::Completed);
    let parsed = parsed.expect("handler ran");
    assert_eq!(parsed["publisher"], json!("fs"));
    assert_eq!(parsed["creators"][0]["role"], json!("designer"));
}

#[test]
fn item_errors_surface_under_their_creator() {
    let mut store = FormStore::new(product_schema(), FormValues::new());
    store.set_value("name", json!("Burger Quest"));
    store.set_value("publisher", json!("bg"));
    store.set_value("creators", json!([{ "role": "lead" }, { "role": "" }]));

    store.submit(|_| Ok(()));
    let errors = item_errors(&store, "creators", 1);
    assert_eq!(errors.get("role"), Some(&vec!["Role is required".to_string()]));
    assert!(item_errors(&store, "creators", 0).is_empty());
}

#[test]
fn async_submit_holds_flag_until_finished() {
    let mut store = FormStore::new(product_schema(), FormValues::new());
    store.set_value("name", json!("Burger Quest"));
    store.set_value("publisher", json!("bg"));
    store.set_value("creators", json!([{ "role": "lead" }]));

    let parsed = match store.begin_submit() {
        BeginSubmit::Valid(parsed) => parsed,
        other => panic!("expected Valid, got {other:?}"),
    };
    assert!(store.is_submitting());
    assert_eq!(parsed["name"], json!("Burger Quest"));

    // While in flight, nothing else may start a submit.
    assert_eq!(store.submit(|_| Ok(())), SubmitOutcome::AlreadySubmitting);

    store.finish_submit(Err("persistence rejected the write".into()));
    assert!(!store.is_submitting());
}

#[test]
fn page_raises_notification_after_save_and_handoff_survives_redirect() {
    let notifier = Notifier::new();

    // The page decides to notify; the engine never does this itself.
    notifier.push(Message::success("Product saved"));
    assert_eq!(notifier.current().unwrap().message.text, "Product saved");

    // A server-driven redirect hands the next page its confirmation.
    let mut cookie = MemoryHandoff::stash(r#"{"type":"success","text":"Product deleted"}"#);
    drain_handoff(&mut cookie, &notifier).expect("payload accepted");
    let head = notifier.current().unwrap();
    assert_eq!(head.message.text, "Product deleted");
    // Replace-on-add: the earlier toast is gone.
    assert_eq!(notifier.len(), 1);
}
