use super::status::StatusMap;
use super::ReportRow;
use crate::types::target::target_key;

const HEADER: [&str; 14] = [
    "status",
    "score",
    "priority",
    "name",
    "path",
    "type",
    "layer",
    "coveragePct",
    "coverageScore",
    "BC",
    "CC",
    "ER",
    "testability",
    "dependencyCount",
];

pub fn to_csv(rows: &[ReportRow<'_>]) -> String {
    let mut output = HEADER.join(",");
    output.push('\n');
    for row in rows {
        let scored = row.target;
        let fields = [
            row.status.to_string(),
            format!("{:.2}", scored.score),
            scored.priority.to_string(),
            quote(&scored.target.name),
            quote(&scored.target.path),
            quote(&scored.target.kind),
            quote(&scored.layer),
            scored
                .coverage_pct
                .map(|pct| format!("{pct:.1}"))
                .unwrap_or_default(),
            scored.coverage_score.to_string(),
            scored.bc.to_string(),
            scored.cc.to_string(),
            scored.er.to_string(),
            scored.testability.to_string(),
            scored.dependency_count.to_string(),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }
    output
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits CSV content into records. Quoted fields may contain commas,
/// doubled quotes and line breaks; blank lines are dropped.
fn records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => quoted = !quoted,
            (',', false) => fields.push(std::mem::take(&mut current)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut current));
                push_record(&mut records, std::mem::take(&mut fields));
            }
            (other, _) => current.push(other),
        }
    }
    fields.push(current);
    push_record(&mut records, fields);
    records
}

fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>) {
    if fields.iter().any(|field| !field.trim().is_empty()) {
        records.push(fields);
    }
}

/// Recovers statuses from a CSV report, locating columns from the header.
pub fn parse_statuses(content: &str) -> Result<StatusMap, String> {
    let mut records = records(content).into_iter();
    let header = records.next().ok_or("empty CSV report")?;
    let column = |label: &str| {
        header
            .iter()
            .position(|cell| cell.trim().eq_ignore_ascii_case(label))
            .ok_or_else(|| format!("CSV report has no `{label}` column"))
    };
    let (status_col, name_col, path_col) =
        (column("status")?, column("name")?, column("path")?);

    let mut statuses = StatusMap::new();
    for fields in records {
        let (Some(status), Some(name), Some(path)) = (
            fields.get(status_col),
            fields.get(name_col),
            fields.get(path_col),
        ) else {
            continue;
        };
        if let Ok(status) = status.parse() {
            statuses
                .entry(target_key(path.trim(), name.trim()))
                .or_insert(status);
        }
    }
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_rows;
    use crate::report::fixtures::scored;
    use crate::report::status::Status;
    use crate::types::scoring::Priority;

    #[test]
    fn csv_rows_follow_header_order() {
        let mut targets = vec![scored("charge", "src/payments/charge.ts", 7.9, Priority::P0)];
        targets[0].coverage_pct = None;
        let rows = build_rows(&targets, &StatusMap::new());

        let rendered = to_csv(&rows);
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some(
                "status,score,priority,name,path,type,layer,coveragePct,\
                 coverageScore,BC,CC,ER,testability,dependencyCount"
            )
        );
        assert_eq!(
            lines.next(),
            Some("TODO,7.90,P0,charge,src/payments/charge.ts,function,services,,5,7,3,6,4,2")
        );
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(
            records("DONE,\"a,b\",\"say \"\"hi\"\"\""),
            vec![vec!["DONE", "a,b", "say \"hi\""]]
        );
    }

    #[test]
    fn parses_statuses_by_header_position() {
        let content = "\
name,path,status
charge,src/payments/charge.ts,done
\"odd,name\",src/odd.ts,SKIP
refund,src/payments/refund.ts,maybe
";
        let statuses = parse_statuses(content).expect("csv should parse");
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses.get("src/payments/charge.ts#charge"), Some(&Status::Done));
        assert_eq!(statuses.get("src/odd.ts#odd,name"), Some(&Status::Skip));
    }

    #[test]
    fn quoted_line_breaks_stay_inside_one_record() {
        let targets = vec![scored("multi\nline", "src/odd.ts", 5.0, Priority::P2)];
        let mut prior = StatusMap::new();
        prior.insert(targets[0].key(), Status::Skip);
        let rows = build_rows(&targets, &prior);

        let statuses = parse_statuses(&to_csv(&rows)).expect("csv should parse");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.get(&targets[0].key()), Some(&Status::Skip));
    }

    #[test]
    fn crlf_line_endings_parse() {
        let statuses = parse_statuses("status,name,path\r\nDONE,add,src/a.ts\r\n")
            .expect("csv should parse");
        assert_eq!(statuses.get("src/a.ts#add"), Some(&Status::Done));
    }

    #[test]
    fn missing_columns_are_an_error() {
        assert!(parse_statuses("status,score\nTODO,1.0\n").is_err());
    }
}
