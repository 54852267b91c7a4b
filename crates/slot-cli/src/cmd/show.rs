use crate::output::print_json;
use slot_core::{render, Store};

pub fn run(store: &Store, name: &str, json: bool) -> anyhow::Result<()> {
    let slots = super::load(store)?;
    let Some(slot) = slots.get(name) else {
        return Err(super::not_found(&slots, name).into());
    };
    let placeholders = render::placeholders(&slot.cmd);

    if json {
        print_json(&serde_json::json!({
            "name": slot.name,
            "cmd": slot.cmd,
            "tags": slot.tags,
            "description": slot.description,
            "placeholders": placeholders,
        }))?;
        return Ok(());
    }

    println!("name:         {}", slot.name);
    if !slot.tags.is_empty() {
        println!("tags:         {}", slot.tags.join(", "));
    }
    if let Some(description) = &slot.description {
        println!("description:  {description}");
    }
    if !placeholders.is_empty() {
        println!("placeholders: {}", placeholders.join(", "));
    }
    println!("cmd:");
    for line in slot.cmd.lines() {
        println!("  {line}");
    }
    Ok(())
}
