use crate::analyzer::{Period, Summary};
use crate::errors::ReportError;
use crate::format::{currency, percentage};
use crate::layout::{Align, Document, Font, LayoutContext};
use crate::pdf;
use chrono::NaiveDateTime;
use log::debug;
use std::path::Path;

pub const TITLE: &str = "Financial Performance Report";

/// Format of the generation timestamp printed under the title.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Table columns and their widths in millimetres.
const COLUMNS: [(&str, f32); 4] = [
    ("Month", 40.0),
    ("Revenue", 30.0),
    ("Expenses", 30.0),
    ("Profit", 30.0),
];

const ROW_HEIGHT: f32 = 10.0;
const SUMMARY_LINE_HEIGHT: f32 = 8.0;

/// Lays out the full report: title block, summary statistics and the monthly
/// data table.
pub fn render_report(
    periods: &[Period],
    summary: &Summary,
    generated_at: NaiveDateTime,
) -> Document {
    let mut ctx = LayoutContext::new();

    title_block(&mut ctx, generated_at);
    summary_section(&mut ctx, summary);
    table_section(&mut ctx, periods);

    let document = ctx.finish();
    debug!(
        "laid out {} periods over {} pages",
        periods.len(),
        document.pages.len()
    );
    document
}

/// Encodes `document` and writes it to `path`, replacing any existing file.
pub fn write_report(document: &Document, path: &Path) -> Result<(), ReportError> {
    let bytes = pdf::encode(document, TITLE)?;
    pdf::persist(&bytes, path)
}

fn title_block(ctx: &mut LayoutContext, generated_at: NaiveDateTime) {
    ctx.set_font(Font::bold(16.0));
    ctx.text_line(10.0, TITLE, Align::Center);
    ctx.new_line(10.0);

    ctx.set_font(Font::regular(10.0));
    let generated = format!("Generated on: {}", generated_at.format(TIMESTAMP_FORMAT));
    ctx.text_line(10.0, &generated, Align::Center);
    ctx.new_line(15.0);
}

fn summary_section(ctx: &mut LayoutContext, summary: &Summary) {
    ctx.set_font(Font::bold(12.0));
    ctx.text_line(10.0, "Summary Statistics", Align::Left);

    ctx.set_font(Font::regular(10.0));
    let lines = [
        format!("Period Covered: {} months", summary.period_count),
        format!("Total Revenue: {}", currency(summary.total_revenue)),
        format!("Total Expenses: {}", currency(summary.total_expenses)),
        format!("Total Profit: {}", currency(summary.total_profit)),
        format!(
            "Average Profit Margin: {}",
            percentage(summary.avg_profit_margin)
        ),
    ];
    for line in &lines {
        ctx.text_line(SUMMARY_LINE_HEIGHT, line, Align::Left);
    }
    ctx.new_line(10.0);
}

fn table_section(ctx: &mut LayoutContext, periods: &[Period]) {
    ctx.set_font(Font::bold(12.0));
    ctx.text_line(10.0, "Monthly Data", Align::Left);

    table_header(ctx);
    for period in periods {
        // Rows never straddle pages, and every continuation page repeats
        // the header so its columns stay labelled.
        if !ctx.fits(ROW_HEIGHT) {
            ctx.break_page();
            table_header(ctx);
        }

        let cells = [
            (period.month.clone(), Align::Left),
            (currency(period.revenue), Align::Right),
            (currency(period.expenses), Align::Right),
            (currency(period.profit), Align::Right),
        ];
        for ((text, align), (_, width)) in cells.iter().zip(COLUMNS) {
            ctx.cell(width, ROW_HEIGHT, text, *align, true);
        }
        ctx.new_line(ROW_HEIGHT);
    }
}

fn table_header(ctx: &mut LayoutContext) {
    ctx.set_font(Font::bold(10.0));
    for (name, width) in COLUMNS {
        ctx.cell(width, ROW_HEIGHT, name, Align::Center, true);
    }
    ctx.new_line(ROW_HEIGHT);
    ctx.set_font(Font::regular(10.0));
}
