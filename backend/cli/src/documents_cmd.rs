//! Read and delete commands over stored documents.

use std::path::Path;

use anyhow::{Context as _, Result};
use uuid::Uuid;

use scanflow_core::DocumentRecord;

use crate::context::Context;
use crate::terminal_output::{
    note_info, note_success, note_warn, render_table, styled, Column, BOLD, DIM,
};

pub async fn list(ctx: &Context) -> Result<()> {
    let records = ctx.app()?.list().await;
    if records.is_empty() {
        note_info("No documents yet. Run `scanflow scan <image>` to add one.");
        return Ok(());
    }

    let columns = vec![
        Column::new("Id"),
        Column::new("Title").max_width(40),
        Column::new("Category"),
        Column::new("Captured"),
        Column::new("Signed"),
    ];
    let rows: Vec<Vec<String>> = records.iter().map(row).collect();
    print!("{}", render_table(&columns, &rows));
    Ok(())
}

fn row(record: &DocumentRecord) -> Vec<String> {
    vec![
        record.id.to_string(),
        record.title.clone(),
        record.category.to_string(),
        record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        if record.is_signed() { "yes" } else { "" }.to_string(),
    ]
}

pub async fn show(ctx: &Context, id: Uuid) -> Result<()> {
    let app = ctx.app()?;
    app.open(id).await?;
    if let Some(record) = app.active().await {
        print_record(&record);
    }
    Ok(())
}

pub fn print_record(record: &DocumentRecord) {
    println!();
    println!("{}", styled(&record.title, BOLD));
    println!(
        "{}",
        styled(
            &format!(
                "{} · {} · {}",
                record.category,
                record.timestamp.format("%Y-%m-%d %H:%M UTC"),
                record.id
            ),
            DIM
        )
    );
    println!();
    println!("{}", record.summary);
    println!();
    println!("{}", styled("Extracted text", BOLD));
    println!("{}", record.extracted_text);
    if record.is_signed() {
        println!();
        println!("{}", styled("Signed", BOLD));
    }
}

pub async fn delete(ctx: &Context, id: Uuid) -> Result<()> {
    if ctx.app()?.delete(id).await? {
        note_success(&format!("Deleted {id}"));
    } else {
        note_warn(&format!("No document with id {id}"));
    }
    Ok(())
}

/// Print the printable view, or write it to `out`.
pub async fn export(ctx: &Context, id: Uuid, out: Option<&Path>) -> Result<()> {
    let page = ctx.app()?.export(id).await?;
    match out {
        Some(path) => {
            tokio::fs::write(path, page.as_bytes())
                .await
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            note_success(&format!("Exported to {}", path.display()));
        }
        None => print!("{page}"),
    }
    Ok(())
}
