use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use fieldmatch_core::BusinessContext;
use fieldmatch_cli::workflow::{InspectOutcome, MatchOutcome};
use fieldmatch_model::{ConfidenceTier, FieldMapping, IssueSeverity};

pub fn print_match_summary(outcome: &MatchOutcome) {
    let sheet = &outcome.sheet;
    if !sheet.sheet_name.is_empty() {
        println!("Sheet: {}", sheet.sheet_name);
    }
    if !sheet.candidate_models.is_empty() {
        println!("Candidate models: {}", sheet.candidate_models.join(", "));
    }
    if !outcome.load.dropped.is_empty() {
        println!("Catalog rows dropped: {}", outcome.load.dropped.len());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Model"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Tier"),
        header_cell("Strategies"),
        header_cell("Alternatives"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 6, CellAlignment::Right);
    for column in &sheet.columns {
        match column.best() {
            Some(best) => table.add_row(vec![
                Cell::new(&column.column).add_attribute(Attribute::Bold),
                Cell::new(&best.target_model).fg(Color::Blue),
                Cell::new(&best.target_field),
                confidence_cell(best.confidence),
                tier_cell(best.tier),
                Cell::new(strategy_list(best)),
                count_cell(best.alternatives.len()),
            ]),
            None => table.add_row(vec![
                Cell::new(&column.column).add_attribute(Attribute::Bold),
                dim_cell("unmapped"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    let counts = sheet.count_by_tier();
    let high = counts.get(&ConfidenceTier::High).copied().unwrap_or(0);
    let medium = counts.get(&ConfidenceTier::Medium).copied().unwrap_or(0);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{high} high, {medium} medium"))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} unmapped", sheet.unmapped_columns().len()))
            .add_attribute(Attribute::Bold),
        confidence_cell(sheet.mean_confidence()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_strategy_failures(outcome);
}

fn print_strategy_failures(outcome: &MatchOutcome) {
    let failures: Vec<_> = outcome
        .sheet
        .columns
        .iter()
        .flat_map(|column| {
            column
                .failed_strategies()
                .map(move |run| (column.column.as_str(), run))
        })
        .collect();
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Strategy"),
        header_cell("Failure"),
    ]);
    apply_table_style(&mut table);
    for (column, run) in failures {
        table.add_row(vec![
            Cell::new(column),
            Cell::new(&run.strategy).fg(Color::Yellow),
            Cell::new(run.failure.as_deref().unwrap_or("-")),
        ]);
    }
    println!();
    println!("Strategy failures:");
    println!("{table}");
}

pub fn print_recommendations(context: &BusinessContext) {
    if context.domains.is_empty() {
        println!("No business domain recognized from the column names.");
        return;
    }
    let mut domains = Table::new();
    domains.set_header(vec![
        header_cell("Domain"),
        header_cell("Score"),
        header_cell("Required"),
        header_cell("Optional"),
        header_cell("Patterns"),
    ]);
    apply_table_style(&mut domains);
    for column in 1..=4 {
        align_column(&mut domains, column, CellAlignment::Right);
    }
    for domain in &context.domains {
        domains.add_row(vec![
            Cell::new(&domain.domain)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(format!("{:.2}", domain.score)),
            ratio_cell(domain.required_ratio),
            ratio_cell(domain.optional_ratio),
            ratio_cell(domain.pattern_boost),
        ]);
    }
    println!("{domains}");

    let mut models = Table::new();
    models.set_header(vec![
        header_cell("Model"),
        header_cell("Score"),
        header_cell("Domains"),
    ]);
    apply_table_style(&mut models);
    align_column(&mut models, 1, CellAlignment::Right);
    for recommendation in &context.models {
        models.add_row(vec![
            Cell::new(&recommendation.model).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.2}", recommendation.score)),
            Cell::new(recommendation.domains.join(", ")),
        ]);
    }
    println!();
    println!("Recommended models:");
    println!("{models}");
}

pub fn print_inspection(outcome: &InspectOutcome) {
    let stats = &outcome.stats;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Catalog"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Models", stats.models),
        ("Fields", stats.fields),
        ("Relational fields", stats.relational_fields),
        ("Selection fields", stats.selection_fields),
        ("Required fields", stats.required_fields),
        ("Relationship edges", stats.graph_edges),
        ("Constraints", stats.constraints),
        ("Relation tables", stats.relations),
        ("Selection options", outcome.load.selection_options),
    ];
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Dropped rows").add_attribute(Attribute::Bold),
        count_cell(outcome.load.dropped.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if !outcome.load.dropped.is_empty() {
        let mut dropped = Table::new();
        dropped.set_header(vec![
            header_cell("Kind"),
            header_cell("Row"),
            header_cell("Reason"),
        ]);
        apply_table_style(&mut dropped);
        for item in &outcome.load.dropped {
            dropped.add_row(vec![
                Cell::new(item.kind.as_str()),
                Cell::new(&item.name),
                dim_cell(&item.reason),
            ]);
        }
        println!();
        println!("Dropped rows:");
        println!("{dropped}");
    }

    let issues = &outcome.integrity.issues;
    if issues.is_empty() {
        return;
    }
    let mut ordered: Vec<_> = issues.iter().collect();
    ordered.sort_by(|a, b| {
        severity_rank(a.severity)
            .cmp(&severity_rank(b.severity))
            .then_with(|| a.model.cmp(&b.model))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Model"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in ordered {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.model),
            Cell::new(issue.field.as_deref().unwrap_or("-")),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Integrity issues:");
    println!("{table}");
}

fn strategy_list(mapping: &FieldMapping) -> String {
    if mapping.strategies.is_empty() {
        return mapping.provenance.clone();
    }
    mapping.strategies.join(", ")
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn confidence_cell(confidence: f64) -> Cell {
    Cell::new(format!("{confidence:.3}"))
}

fn ratio_cell(ratio: f64) -> Cell {
    if ratio > 0.0 {
        Cell::new(format!("{:.0}%", ratio * 100.0))
    } else {
        dim_cell("0%")
    }
}

fn tier_cell(tier: Option<ConfidenceTier>) -> Cell {
    match tier {
        Some(ConfidenceTier::High) => Cell::new("HIGH")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(ConfidenceTier::Medium) => Cell::new("MEDIUM").fg(Color::Yellow),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn severity_rank(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Error => 0,
        IssueSeverity::Warning => 1,
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
