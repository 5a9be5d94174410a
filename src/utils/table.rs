use crate::models::AuditResult;

const HEADERS: [&str; 6] = [
    "URL",
    "Accessibility",
    "Best practices",
    "Performance",
    "PWA",
    "SEO",
];

// Fixed-width console table; a dash marks a category the audit did not
// score.
pub fn score_table(results: &[AuditResult]) -> String {
    let rows: Vec<[String; 6]> = results
        .iter()
        .map(|result| {
            let entries = result.scores.entries();
            [
                result.url.clone(),
                cell(entries[0].1),
                cell(entries[1].1),
                cell(entries[2].1),
                cell(entries[3].1),
                cell(entries[4].1),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = [0; 6];
    for (i, header) in HEADERS.iter().enumerate() {
        widths[i] = header.len();
    }
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    push_row(&mut out, &widths.map(|width| "-".repeat(width)), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn cell(score: Option<u8>) -> String {
    match score {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scores;

    #[test]
    fn table_lists_every_result_under_the_header() {
        let results = vec![AuditResult {
            name: "Home".to_string(),
            url: "https://example.com".to_string(),
            report: None,
            local_report: None,
            scores: Scores {
                accessibility: Some(98),
                best_practices: Some(93),
                performance: Some(7),
                progressive_web_app: None,
                seo: Some(100),
            },
        }];
        let table = score_table(&results);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("URL"));
        assert!(lines[0].contains("Performance"));
        assert!(lines[2].starts_with("https://example.com"));
        assert!(lines[2].contains("98"));
        assert!(lines[2].contains("-"));
    }

    #[test]
    fn empty_results_still_render_the_header() {
        let table = score_table(&[]);
        assert_eq!(table.lines().count(), 2);
    }
}
