//! Remote script synthesis for the four file operations.
//!
//! Each builder returns one self-contained POSIX shell script that checks its
//! own precondition, performs the operation, and prints a self-describing
//! report, so a single exec-and-capture round trip is enough. Script text is
//! deterministic for a given argument set; anything that depends on remote
//! state (totals, timestamps) is computed by the script itself.
//!
//! Reserved exit codes: 1 = target missing, 2 = pattern not found.

use crate::tools::{EditBlockArgs, ReadLinesArgs, SearchCodeArgs, WriteChunkArgs};
use crate::utils::shell::{escape_pattern, escape_replacement, quote_content, quote_path};

pub fn read_lines(args: &ReadLinesArgs) -> String {
    let mut lines = vec![
        format!("f={}", quote_path(&args.file_path)),
        r#"if [ ! -f "$f" ]; then"#.to_string(),
        r#"  echo "Error: File not found: $f""#.to_string(),
        "  exit 1".to_string(),
        "fi".to_string(),
        r#"total=$(grep -c '' "$f")"#.to_string(),
        format!("start={}", args.start_line),
    ];
    match args.end_line {
        Some(end) => lines.push(format!("end={}", end)),
        None => {
            lines.push(format!("end=$((start + {} - 1))", args.max_lines));
            lines.push(r#"if [ "$end" -gt "$total" ]; then"#.to_string());
            lines.push(r#"  end="$total""#.to_string());
            lines.push("fi".to_string());
        }
    }
    lines.push(r#"echo "File: $f ($total lines, showing $start-$end)""#.to_string());
    lines.push(r#"echo "---""#.to_string());
    lines.push(r#"sed -n "${start},${end}p" "$f""#.to_string());
    lines.join("\n")
}

pub fn edit_block(args: &EditBlockArgs) -> String {
    let old = escape_pattern(&args.old_text);
    let new = escape_replacement(&args.new_text);
    let expected = args.expected_replacements;
    let lines = vec![
        format!("f={}", quote_path(&args.file_path)),
        r#"if [ ! -f "$f" ]; then"#.to_string(),
        r#"  echo "Error: File not found: $f""#.to_string(),
        "  exit 1".to_string(),
        "fi".to_string(),
        format!(r#"before=$(grep -o "{}" "$f" | wc -l)"#, old),
        "ts=$(date +%Y%m%d%H%M%S)".to_string(),
        r#"cp "$f" "$f.bak.$ts""#.to_string(),
        format!(r#"sed -i "s/{}/{}/g" "$f""#, old, new),
        format!(r#"after=$(grep -o "{}" "$f" | wc -l)"#, new),
        r#"if [ "$before" -eq 0 ]; then"#.to_string(),
        r#"  echo "Warning: pattern not found in $f""#.to_string(),
        "  exit 2".to_string(),
        "fi".to_string(),
        r#"echo "Backup created: $f.bak.$ts""#.to_string(),
        r#"echo "Replaced $before occurrence(s)""#.to_string(),
        r#"echo "Occurrences before: $before, replacement occurrences after: $after""#.to_string(),
        format!(r#"if [ "$before" -ne {} ]; then"#, expected),
        format!(
            r#"  echo "Warning: expected {} replacement(s), found $before""#,
            expected
        ),
        "fi".to_string(),
    ];
    lines.join("\n")
}

pub fn search_code(args: &SearchCodeArgs) -> String {
    let glob_display = args.file_pattern.as_deref().unwrap_or("*");
    let mut find_cmd = String::from(r#"find "$d" -type f"#);
    if let Some(glob) = &args.file_pattern {
        find_cmd.push_str(&format!(" -name {}", quote_path(glob)));
    }
    find_cmd.push_str(" -print0 2>/dev/null");

    let mut grep_flags = String::from("-n -H");
    if args.ignore_case {
        grep_flags.push_str(" -i");
    }
    if args.context_lines > 0 {
        grep_flags.push_str(&format!(" -C {}", args.context_lines));
    }

    let lines = vec![
        format!("d={}", quote_path(&args.path)),
        format!("pat={}", quote_content(&args.pattern)),
        r#"if [ ! -d "$d" ]; then"#.to_string(),
        r#"  echo "Error: Directory not found: $d""#.to_string(),
        "  exit 1".to_string(),
        "fi".to_string(),
        format!(
            r#"echo "Searching for '$pat' in $d (files: {})""#,
            glob_display
        ),
        r#"echo "---""#.to_string(),
        format!(
            r#"matches=$({} | xargs -0 -r grep {} -- "$pat" 2>/dev/null | head -n {})"#,
            find_cmd, grep_flags, args.max_results
        ),
        r#"if [ -n "$matches" ]; then"#.to_string(),
        r#"  echo "$matches""#.to_string(),
        "else".to_string(),
        r#"  echo "No matches found""#.to_string(),
        "fi".to_string(),
    ];
    lines.join("\n")
}

pub fn write_chunk(args: &WriteChunkArgs) -> String {
    let redirect = if args.mode.is_append() { ">>" } else { ">" };
    let lines = vec![
        format!("f={}", quote_path(&args.file_path)),
        r#"mkdir -p "$(dirname "$f")""#.to_string(),
        format!(
            "if printf '%s' {} {} \"$f\"; then",
            quote_content(&args.content),
            redirect
        ),
        r#"  size=$(wc -c < "$f")"#.to_string(),
        r#"  lines=$(grep -c '' "$f")"#.to_string(),
        format!(r#"  echo "Successfully wrote ({}): $f""#, args.mode.label()),
        r#"  echo "Bytes: $size, Lines: $lines""#.to_string(),
        "else".to_string(),
        r#"  echo "Error: Failed to write: $f""#.to_string(),
        "  exit 1".to_string(),
        "fi".to_string(),
    ];
    lines.join("\n")
}
