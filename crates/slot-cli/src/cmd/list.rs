use crate::output::print_json;
use slot_core::listing::{self, TableOptions};
use slot_core::paths;
use slot_core::slot::normalize_tags;
use slot_core::{Slot, Store};
use std::io::Write;

pub fn run(store: &Store, tags: &[String], tsv: bool, wide: bool, json: bool) -> anyhow::Result<()> {
    let slots = super::load(store)?;
    let required = normalize_tags(tags.iter().map(String::as_str));

    let mut items: Vec<&Slot> = slots.filter_by_tags(&required);
    items.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(total = slots.len(), shown = items.len(), "listing slots");

    if json {
        return print_json(&items);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if tsv {
        listing::write_tsv(&mut out, &items)?;
    } else {
        let opts = TableOptions {
            max_cmd_width: if wide {
                None
            } else {
                Some(listing::DEFAULT_CMD_WIDTH)
            },
        };
        listing::write_table(&mut out, &items, opts)?;
        writeln!(out, "\n{}", paths::to_slash(store.path()))?;
    }
    out.flush()?;
    Ok(())
}
