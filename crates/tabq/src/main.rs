#![forbid(unsafe_code)]

use std::process::ExitCode;

use comfy_table::presets::ASCII_FULL;
use tq_expr::{parse_aggregate, parse_filter};
use tq_io::read_table;
use tq_table::{AggregateSummary, Table};

#[derive(Debug, Clone)]
struct CliArgs {
    path: String,
    where_expr: Option<String>,
    aggregate_expr: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), String> {
    let args = parse_args(std::env::args().skip(1))?;
    let table = read_table(&args.path).map_err(|error| error.to_string())?;

    let table = apply_where(&table, args.where_expr.as_deref())?;

    match args.aggregate_expr.as_deref() {
        Some(raw) => {
            let expr = parse_aggregate(raw).map_err(|error| error.to_string())?;
            if !table.has_column(&expr.column) {
                return Err(format!("column {:?} not found in file", expr.column));
            }
            let summary = table.aggregate(&expr).map_err(|error| error.to_string())?;
            println!("{}", render_summary(&summary));
        }
        None if table.is_empty() => println!("No data"),
        None => println!("{}", render_rows(&table)),
    }

    Ok(())
}

fn apply_where(table: &Table, raw: Option<&str>) -> Result<Table, String> {
    let Some(raw) = raw else {
        return Ok(table.clone());
    };
    // An empty --where value means no filter was requested at all.
    match parse_filter(raw).map_err(|error| error.to_string())? {
        Some(expr) => {
            if !table.has_column(&expr.column) {
                return Err(format!("column {:?} not found in file", expr.column));
            }
            table.filter(&expr).map_err(|error| error.to_string())
        }
        None => Ok(table.clone()),
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut path: Option<String> = None;
    let mut where_expr = None;
    let mut aggregate_expr = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--where" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--where requires a value (e.g. points>20)".to_owned())?;
                where_expr = Some(value);
            }
            "--aggregate" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--aggregate requires a value (e.g. avg:points)".to_owned())?;
                aggregate_expr = Some(value);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown argument: {other}"));
            }
            other => {
                if path.is_some() {
                    return Err(format!("unexpected extra positional argument: {other}"));
                }
                path = Some(other.to_owned());
            }
        }
    }

    let path = path.ok_or_else(|| "a file path is required (see --help)".to_owned())?;

    Ok(CliArgs {
        path,
        where_expr,
        aggregate_expr,
    })
}

fn render_rows(table: &Table) -> comfy_table::Table {
    let mut grid = comfy_table::Table::new();
    grid.load_preset(ASCII_FULL);
    grid.set_header(table.headers().to_vec());
    for row in table.rows() {
        grid.add_row(
            table
                .headers()
                .iter()
                .map(|header| row.get(header).map_or("", String::as_str))
                .collect::<Vec<_>>(),
        );
    }
    grid
}

fn render_summary(summary: &AggregateSummary) -> comfy_table::Table {
    let mut grid = comfy_table::Table::new();
    grid.load_preset(ASCII_FULL);
    grid.set_header(vec!["column", "type", "value"]);
    grid.add_row(vec![
        summary.column.clone(),
        summary.kind.label().to_owned(),
        summary.value.to_string(),
    ]);
    grid
}

fn print_help() {
    println!(
        "tabq\n\
         Usage:\n\
         \ttabq <file> [--where <column><op><value>] [--aggregate <kind>:<column>]\n\
         Options:\n\
         \t--where <expr>       keep rows where the column compares true;\n\
         \t                     <op> is one of ==, =, <, >\n\
         \t--aggregate <expr>   print one statistic over a column;\n\
         \t                     <kind> is one of avg, min, max\n\
         \t-h, --help           show this help"
    );
}

#[cfg(test)]
mod tests {
    use tq_table::{Row, Table};
    use tq_types::AggregateKind;

    use super::{AggregateSummary, apply_where, parse_args, render_rows, render_summary};

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|arg| (*arg).to_owned())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn sample_table() -> Table {
        let headers = vec!["name".to_owned(), "points".to_owned()];
        let rows = vec![
            Row::from([
                ("name".to_owned(), "Jordan".to_owned()),
                ("points".to_owned(), "50".to_owned()),
            ]),
            Row::from([
                ("name".to_owned(), "James".to_owned()),
                ("points".to_owned(), "25".to_owned()),
            ]),
        ];
        Table::new(headers, rows)
    }

    #[test]
    fn parse_args_accepts_path_and_flags() {
        let parsed = parse_args(args(&[
            "players.csv",
            "--where",
            "points>20",
            "--aggregate",
            "avg:points",
        ]))
        .expect("parse");
        assert_eq!(parsed.path, "players.csv");
        assert_eq!(parsed.where_expr.as_deref(), Some("points>20"));
        assert_eq!(parsed.aggregate_expr.as_deref(), Some("avg:points"));
    }

    #[test]
    fn parse_args_requires_a_path() {
        let err = parse_args(args(&["--where", "a=b"])).expect_err("no path");
        assert!(err.contains("file path"));
    }

    #[test]
    fn parse_args_rejects_unknown_flags() {
        let err = parse_args(args(&["players.csv", "--order-by", "x"])).expect_err("unknown flag");
        assert!(err.contains("--order-by"));
    }

    #[test]
    fn parse_args_rejects_flag_without_value() {
        let err = parse_args(args(&["players.csv", "--aggregate"])).expect_err("missing value");
        assert!(err.contains("--aggregate"));
    }

    #[test]
    fn empty_where_value_leaves_rows_untouched() {
        let table = sample_table();
        let out = apply_where(&table, Some("")).expect("apply");
        assert_eq!(out.rows().len(), 2);
    }

    #[test]
    fn unknown_filter_column_is_reported_by_name() {
        let table = sample_table();
        let err = apply_where(&table, Some("salary>1")).expect_err("unknown column");
        assert!(err.contains("salary"));
    }

    #[test]
    fn rendered_rows_follow_header_order() {
        let table = sample_table();
        let rendered = render_rows(&table).to_string();
        let name_at = rendered.find("name").expect("name header");
        let points_at = rendered.find("points").expect("points header");
        assert!(name_at < points_at);
        assert!(rendered.contains("Jordan"));
        assert!(rendered.contains("25"));
    }

    #[test]
    fn rendered_summary_has_column_type_value() {
        let summary = AggregateSummary {
            column: "points".to_owned(),
            kind: AggregateKind::Average,
            value: 35.25,
        };
        let rendered = render_summary(&summary).to_string();
        assert!(rendered.contains("column"));
        assert!(rendered.contains("type"));
        assert!(rendered.contains("value"));
        assert!(rendered.contains("avg"));
        assert!(rendered.contains("35.25"));
    }
}
