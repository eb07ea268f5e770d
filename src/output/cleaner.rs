//! Markdown post-processing applied before pages enter the corpus

/// Cleans converted Markdown for the corpus file
///
/// - trims the whole text and every line
/// - collapses runs of blank lines to a single blank line between two plain
///   lines; when either neighbouring line starts with `#`, `*` or `-` the run is
///   dropped entirely
///
/// Idempotent: cleaning already-cleaned text returns it unchanged.
///
/// # Examples
///
/// ```
/// use sitecorpus::output::clean_content;
///
/// assert_eq!(clean_content("  one  \n\n\n\n two "), "one\n\ntwo");
/// assert_eq!(clean_content("# Title\n\n\nBody"), "# Title\nBody");
/// ```
pub fn clean_content(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.trim().lines().map(str::trim).collect();
    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());

    let mut index = 0;
    while index < lines.len() {
        if !lines[index].is_empty() {
            cleaned.push(lines[index]);
            index += 1;
            continue;
        }

        let run_end = lines[index..]
            .iter()
            .position(|line| !line.is_empty())
            .map_or(lines.len(), |offset| index + offset);

        // `cleaned` never ends in a blank line, so its last entry is the previous
        // non-blank line
        if let (Some(previous), Some(next)) = (cleaned.last(), lines.get(run_end)) {
            if !is_structural(previous) && !is_structural(next) {
                cleaned.push("");
            }
        }

        index = run_end;
    }

    cleaned.join("\n")
}

/// Headings and list items never keep a blank neighbour
fn is_structural(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('*') || line.starts_with('-')
}
