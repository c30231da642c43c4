use shared_types::*;
use std::env;
use std::fs;
use std::path::PathBuf;
use ts_rs::TS;

/// Used when no output directory is given on the command line
const DEFAULT_OUTPUT_DIR: &str = "api-types";

/// Writes `types.ts` into the directory given as the first argument, e.g.
/// `cargo run -p shared-types --bin generate_api_types -- ../web/src/api-types`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut types = Vec::new();

    // Profile and session types
    types.push(clean_type(Currency::export_to_string()?));
    types.push(clean_type(User::export_to_string()?));
    types.push(clean_type(UpdateProfileRequest::export_to_string()?));
    types.push(clean_type(Session::export_to_string()?));
    types.push(clean_type(Identity::export_to_string()?));
    types.push(clean_type(ProfileSeed::export_to_string()?));
    types.push(clean_type(Theme::export_to_string()?));

    // Expense types
    types.push(clean_type(Expense::export_to_string()?));
    types.push(clean_type(ExpenseForm::export_to_string()?));
    types.push(clean_type(Reminder::export_to_string()?));

    // Split types
    types.push(clean_type(Friend::export_to_string()?));
    types.push(clean_type(SplitExpense::export_to_string()?));
    types.push(clean_type(SplitForm::export_to_string()?));

    // Tips
    types.push(clean_type(Tip::export_to_string()?));

    // Analytics types
    types.push(clean_type(CategoryTotal::export_to_string()?));
    types.push(clean_type(CategoryBreakdown::export_to_string()?));
    types.push(clean_type(DailyPoint::export_to_string()?));
    types.push(clean_type(FriendBalance::export_to_string()?));
    types.push(clean_type(SpendingSummary::export_to_string()?));

    fs::create_dir_all(&output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strip what only makes sense in a one-type-per-file layout: the banner
/// comment and `import type` lines (every type lands in the same file).
fn clean_type(type_def: String) -> String {
    let body: Vec<&str> = type_def
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let body = body.join("\n");
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!("{body}\n")
    }
}
