//! Patient Intake Form
//!
//! This example drives a three-step intake wizard without any UI.
//!
//! Key concepts:
//! - Intro consent gates the first step
//! - A questions group stores each answer under a composite key
//! - A signature step needs both a consent flag and a signature
//! - Blocked continue requests report why they were refused
//!
//! Run with: cargo run --example intake_form

use serde_json::json;
use waypoint::steps::{GroupQuestion, QuestionKind, StepConfig};
use waypoint::wizard::{Advance, Wizard};

fn main() {
    println!("=== Patient Intake Example ===\n");

    let mut wizard = Wizard::builder()
        .step(StepConfig::intro("welcome", "Welcome to the clinic"))
        .step(StepConfig::questions_group(
            "about",
            "About you",
            vec![
                GroupQuestion {
                    kind: QuestionKind::Number,
                    ..GroupQuestion::new("age", "Age")
                },
                GroupQuestion::new("city", "City"),
            ],
        ))
        .step(StepConfig::signature_consent(
            "sign",
            "Consent",
            "I consent to treatment",
        ))
        .on_complete(|data| {
            println!("\nSubmitted form data:");
            let mut entries: Vec<_> = data.iter().collect();
            entries.sort_by_key(|(key, _)| *key);
            for (key, value) in entries {
                println!("  {key} = {value}");
            }
            Ok(())
        })
        .build()
        .unwrap();

    println!("Steps: {}", wizard.step_count());
    report(&mut wizard);

    wizard.set_intro_checked(true);
    report(&mut wizard);

    wizard.store().write("about_age", json!(34));
    report(&mut wizard);

    wizard.store().write("about_city", json!("Lisbon"));
    report(&mut wizard);

    wizard.store().write("sign_consent", json!(true));
    wizard.store().write("sign_signature", json!("data:image/png;base64,iVBOR"));
    report(&mut wizard);

    println!("\nPath taken:");
    for position in wizard.history().get_path() {
        println!("  {position:?}");
    }
}

fn report(wizard: &mut Wizard) {
    let step = wizard.current_step().id().to_string();
    match wizard.request_next() {
        Ok(Advance::Blocked(reasons)) => {
            println!("\n[{step}] blocked ({:.0}% done):", wizard.progress());
            for reason in reasons {
                println!("  - {reason}");
            }
        }
        Ok(Advance::Moved { from, to }) => {
            println!("\n[{step}] step {from} -> {to} ({:.0}% done)", wizard.progress());
        }
        Ok(Advance::Completed) => println!("\n[{step}] wizard completed"),
        Err(err) => println!("\n[{step}] error: {err}"),
    }
}
