//! PCD CLI - Tool for inspecting and converting PCD point cloud files.

use std::env;
use std::process;

use pcd_cloud::pcd::{read_pcd_file, read_pcd_file_raw, write_pcd_file};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut filter = "warn";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => filter = "debug",
            "-q" | "--quiet" => filter = "error",
            _ => filtered_args.push(arg),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    match filtered_args[0] {
        // Info command - show header, fields and point counts
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: pcd-cli info <file.pcd>");
                process::exit(1);
            }
            cmd_info(filtered_args[1]);
        }

        // Convert command - re-emit any encoding as binary
        "convert" | "c" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing file arguments");
                eprintln!("Usage: pcd-cli convert <in.pcd> <out.pcd>");
                process::exit(1);
            }
            cmd_convert(filtered_args[1], filtered_args[2]);
        }

        "help" | "-h" | "--help" => print_help(),

        other => {
            eprintln!("Error: unknown command {other:?}");
            print_help();
            process::exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let cloud = match read_pcd_file(path) {
        Ok(cloud) => cloud,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let meta = cloud.metadata();
    println!("file:      {path}");
    println!("version:   {}", meta.version);
    println!("encoding:  {}", meta.data.as_str());
    println!("width:     {}", meta.width);
    println!("height:    {}", meta.height);
    println!("points:    {}", meta.points);
    println!(
        "viewpoint: {}",
        meta.viewpoint
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("fields:");
    for (name, col) in cloud.fields().iter().zip(cloud.table().columns()) {
        println!("  {name:<12} {}", col.scalar_type());
    }
    println!("valid points:   {}", cloud.table().rows());
    println!("invalid points: {}", cloud.invalid_points());
}

fn cmd_convert(input: &str, output: &str) {
    // keep every row: conversion must not drop sentinel points
    let cloud = match read_pcd_file_raw(input) {
        Ok(cloud) => cloud,
        Err(e) => {
            eprintln!("Error reading {input}: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = write_pcd_file(cloud.table(), output) {
        eprintln!("Error writing {output}: {e}");
        process::exit(1);
    }
    println!(
        "wrote {output}: {} points, {} fields (binary)",
        cloud.table().rows(),
        cloud.table().num_columns()
    );
}

fn print_help() {
    println!("PCD point cloud tool");
    println!();
    println!("Usage: pcd-cli [flags] <command> [args]");
    println!();
    println!("Commands:");
    println!("  info <file.pcd>              Show header, fields and point counts");
    println!("  convert <in.pcd> <out.pcd>   Re-emit a cloud with a binary body");
    println!("  help                         Show this help");
    println!();
    println!("Flags:");
    println!("  -v, --verbose    Debug logging");
    println!("  -q, --quiet      Errors only");
}
