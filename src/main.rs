// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
struct Cli {
    /// Path to the road network JSON file
    network_file: PathBuf,

    /// Identifier of the origin vertex
    from: i64,

    /// Identifier of the destination vertex
    to: i64,

    /// Identifier of an intermediate vertex to route through
    #[arg(long)]
    via: Option<i64>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = turnwise::io::read_network(&cli.network_file)?;

    let route = match cli.via {
        Some(via) => turnwise::quickest_route_via(&g, cli.from, via, cli.to)?,
        None => turnwise::quickest_route(&g, cli.from, cli.to)?,
    };
    let directions = turnwise::synthesize_directions(&g, &route)?;

    print!("{}", directions);
    println!("Total distance: {:.2} km", directions.total_distance_km);
    println!("Estimated time: {:.2} hours", directions.total_time_hours);

    Ok(())
}
