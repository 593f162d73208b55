//! # tabkit
//!
//! A CLI for loading tabular text files and printing them as tables.
//!
//! ## Overview
//!
//! tabkit is built on top of tabkitlib and exposes its readers, formatters
//! and ride analytics from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Portfolio report as CSV with formatted prices
//! tabkit report portfolio.csv -F csv --column-format %s --column-format %d --column-format %0.2f
//!
//! # Any CSV file through the column store
//! tabkit table ctabus.csv --types str,str,str,int --slice 0:10
//!
//! # Fixed-width portfolio listing and exact cost
//! tabkit portfolio portfolio.csv
//! tabkit cost portfolio.dat
//!
//! # Ride analytics and memory comparison
//! tabkit rides ctabus.csv top-increases --limit 5
//! tabkit footprint ctabus.csv
//! ```

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use tabkitlib::data::{
    count_passengers, count_route_rides, count_routes, read_rides_as_structs, top_increases,
};
use tabkitlib::output::{print_table, with_output, Attributes, TextTableFormatter};
use tabkitlib::{
    compare_footprints, portfolio_cost, read_csv_as_columns, read_portfolio, ColumnType,
    FormatKind, Record, ReportOptions, SliceSpec, TabkitError, Value,
};
use tracing::debug;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("tabkit")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Load tabular text files into typed structures and print them as tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity (repeat for more)"),
        )
        .subcommand(
            Command::new("report")
                .about("Print a portfolio file as a table")
                .arg(path_arg("Portfolio CSV file (name,shares,price)"))
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .value_delimiter(',')
                        .default_values(["name", "shares", "price"])
                        .help("Attributes to print (comma-separated: name,shares,price,cost)"),
                )
                .args(table_args()),
        )
        .subcommand(
            Command::new("table")
                .about("Load any CSV file into a typed column store and print it")
                .arg(path_arg("CSV file with a header row"))
                .arg(
                    Arg::new("types")
                        .short('t')
                        .long("types")
                        .required(true)
                        .help("Column types (comma-separated: int,float,str,intern)"),
                )
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .value_delimiter(',')
                        .help("Columns to print (defaults to every column)"),
                )
                .arg(
                    Arg::new("slice")
                        .long("slice")
                        .help("Rows to keep, as start:stop[:step]"),
                )
                .args(table_args()),
        )
        .subcommand(
            Command::new("portfolio")
                .about("Print the fixed-width portfolio listing")
                .arg(path_arg("Portfolio CSV file (name,shares,price)")),
        )
        .subcommand(
            Command::new("cost")
                .about("Exact total cost of a whitespace-separated portfolio file")
                .arg(path_arg("Portfolio file with lines of: name shares price")),
        )
        .subcommand(
            Command::new("rides")
                .about("Bus ridership analytics")
                .arg(path_arg("Ride CSV file (route,date,daytype,rides)"))
                .arg(
                    Arg::new("query")
                        .required(true)
                        .value_parser(["routes", "passengers", "route-rides", "top-increases"])
                        .help("What to compute"),
                )
                .arg(
                    Arg::new("route")
                        .short('r')
                        .long("route")
                        .help("Route for the passengers query"),
                )
                .arg(
                    Arg::new("date")
                        .short('d')
                        .long("date")
                        .help("Date for the passengers query (MM/DD/YYYY)"),
                )
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10")
                        .help("Rows to show for top-increases"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("footprint")
                .about("Compare the memory used by each ride representation")
                .arg(path_arg("Ride CSV file (route,date,daytype,rides)"))
                .arg(output_arg()),
        )
}

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help(help)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(["table", "json"])
        .default_value("table")
        .help("Output format")
}

/// Arguments shared by every command that renders through a formatter
fn table_args() -> Vec<Arg> {
    vec![
        Arg::new("format")
            .short('F')
            .long("format")
            .value_parser(["text", "csv", "html"])
            .default_value("text")
            .help("Table encoding"),
        Arg::new("column-format")
            .long("column-format")
            .action(ArgAction::Append)
            .help("printf-style spec for the next column (repeat once per column)"),
        Arg::new("upper-headers")
            .long("upper-headers")
            .action(ArgAction::SetTrue)
            .help("Upper-case the heading row"),
        output_arg(),
    ]
}

fn wants_json(matches: &ArgMatches) -> bool {
    matches.get_one::<String>("output").map(String::as_str) == Some("json")
}

fn path_of(matches: &ArgMatches) -> anyhow::Result<&PathBuf> {
    matches
        .get_one::<PathBuf>("path")
        .ok_or_else(|| anyhow!("missing path"))
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn report_options(matches: &ArgMatches) -> anyhow::Result<ReportOptions> {
    let format: FormatKind = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text")
        .parse()?;
    Ok(ReportOptions::new()
        .format(format)
        .column_formats(strings(matches, "column-format"))
        .upper_headers(matches.get_flag("upper-headers")))
}

/// Project the requested attributes of each item into records for JSON output
fn project<I>(items: I, columns: &[String]) -> anyhow::Result<Vec<Record>>
where
    I: IntoIterator,
    I::Item: Attributes,
{
    items
        .into_iter()
        .map(|item| {
            let mut record = Record::new();
            for name in columns {
                let value = item
                    .attr(name)
                    .ok_or_else(|| TabkitError::UnknownAttribute(name.clone()))?;
                record.insert(name.as_str(), value);
            }
            Ok(record)
        })
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render through the formatter, or as JSON records
fn render<I>(matches: &ArgMatches, items: I, columns: &[String]) -> anyhow::Result<()>
where
    I: IntoIterator,
    I::Item: Attributes,
{
    if wants_json(matches) {
        return print_json(&project(items, columns)?);
    }
    let formatter = report_options(matches)?.build_formatter()?;
    print_table(items, columns, &formatter)?;
    Ok(())
}

fn report_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches)?;
    let portfolio = read_portfolio(path)?;
    debug!(holdings = portfolio.len(), "loaded portfolio");
    render(matches, &portfolio, &strings(matches, "columns"))
}

fn table_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches)?;
    let types = matches
        .get_one::<String>("types")
        .ok_or_else(|| anyhow!("--types is required"))?;
    let coltypes = ColumnType::parse_list(types)?;
    let mut data = read_csv_as_columns(path, &coltypes)?;
    if let Some(spec) = matches.get_one::<String>("slice") {
        let spec: SliceSpec = spec.parse()?;
        data = data.slice_spec(&spec)?;
    }
    let mut columns = strings(matches, "columns");
    if columns.is_empty() {
        columns = data.headers().to_vec();
    }
    render(matches, data.iter(), &columns)
}

fn portfolio_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches)?;
    let portfolio = read_portfolio(path)?;
    with_output(|out| tabkitlib::data::print_portfolio(out, &portfolio))?;
    Ok(())
}

fn cost_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches)?;
    let total = portfolio_cost(path)?;
    println!("Total cost: {}", total);
    Ok(())
}

fn rides_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches)?;
    let rides = read_rides_as_structs(path)?;
    let query = matches
        .get_one::<String>("query")
        .map(String::as_str)
        .unwrap_or("routes");
    let json = wants_json(matches);

    match query {
        "routes" => {
            let count = count_routes(&rides);
            if json {
                print_json(&serde_json::json!({ "routes": count }))
            } else {
                println!("Routes: {}", count);
                Ok(())
            }
        }
        "passengers" => {
            let route = matches
                .get_one::<String>("route")
                .context("passengers needs --route")?;
            let date = matches
                .get_one::<String>("date")
                .context("passengers needs --date")?;
            let count = count_passengers(&rides, route, date);
            if json {
                print_json(&serde_json::json!({ "route": route, "date": date, "rides": count }))
            } else {
                println!("Route {} on {}: {}", route, date, count);
                Ok(())
            }
        }
        "route-rides" => {
            let rows: Vec<Record> = count_route_rides(&rides)
                .into_iter()
                .map(|(route, total)| {
                    Record::from_pairs([
                        ("route", Value::from(route)),
                        ("rides", Value::Int(total)),
                    ])
                })
                .collect();
            summary(json, &rows, &["route", "rides"])
        }
        "top-increases" => {
            let limit = matches.get_one::<usize>("limit").copied().unwrap_or(10);
            let rows: Vec<Record> = top_increases(&rides, limit)
                .into_iter()
                .map(|(route, diff)| {
                    Record::from_pairs([
                        ("route", Value::from(route)),
                        ("increase", Value::Int(diff)),
                    ])
                })
                .collect();
            summary(json, &rows, &["route", "increase"])
        }
        other => Err(anyhow!("unknown rides query: {}", other)),
    }
}

/// Summary tables always use the plain text formatter
fn summary<I>(json: bool, items: I, columns: &[&str]) -> anyhow::Result<()>
where
    I: IntoIterator,
    I::Item: Attributes,
{
    if json {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        return print_json(&project(items, &columns)?);
    }
    print_table(items, columns, &TextTableFormatter)?;
    Ok(())
}

fn footprint_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches)?;
    let report = compare_footprints(path)?;
    if wants_json(matches) {
        return print_json(&report);
    }
    summary(false, &report, &["representation", "rows", "bytes"])
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    logging::init(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("report", sub)) => report_handler(sub),
        Some(("table", sub)) => table_handler(sub),
        Some(("portfolio", sub)) => portfolio_handler(sub),
        Some(("cost", sub)) => cost_handler(sub),
        Some(("rides", sub)) => rides_handler(sub),
        Some(("footprint", sub)) => footprint_handler(sub),
        _ => Err(anyhow!("no command given")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", console::style("Error:").red().bold().for_stderr(), e);
            ExitCode::FAILURE
        }
    }
}
