use log::{debug, info};
use std::env;
use std::num::NonZeroU32;
use v8heapconst::{builtin, ConstantTableStore, Symbolizer, DEFAULT_PAGE_SIZE};

fn print_usage(program: &str) {
    println!("heapconst - V8 heap layout constant tables");
    println!();
    println!("Usage: {} [--table <file.toml>] <command> [args]", program);
    println!("Commands:");
    println!("  type <tag>                 instance type name");
    println!("  map <space> <offset>       known map at a space offset");
    println!("  object <space> <offset>    known object at a space offset");
    println!("  space <address>            space whose first page is at address");
    println!("  address <address>          best name for a heap address");
    println!("  frame <code>               frame marker name");
    println!("  listing                    print the table in generator listing form");
    println!("  export                     print the table as TOML");
    println!("Examples:");
    println!("  {} type 130", program);
    println!("  {} map read_only_space 0x02119", program);
    println!("  {} --table v8heapconst.toml address 0x080c4505", program);
    println!();
    println!("Numbers may be decimal or hex with a 0x prefix. Without --table the");
    println!("embedded shipping-build table is used.");
}

fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|_| format!("Invalid number: {}", s))
}

fn parse_arg<T: TryFrom<u64>>(args: &[String], index: usize, what: &str) -> Result<T, String> {
    let s = args
        .get(index)
        .ok_or_else(|| format!("Missing {}", what))?;
    let n = parse_number(s)?;
    T::try_from(n).map_err(|_| format!("{} out of range: {}", what, s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "heapconst".to_string());

    // Check for --table option
    let loaded;
    let store: &ConstantTableStore = if args.len() >= 3 && args[1] == "--table" {
        let path = args.remove(2);
        args.remove(1);
        loaded = ConstantTableStore::load(&path)?;
        info!("Using table from {}", path);
        &loaded
    } else {
        debug!("Using embedded table");
        builtin()
    };

    if args.len() < 2 {
        print_usage(&program);
        return Ok(());
    }

    let page_size = NonZeroU32::new(DEFAULT_PAGE_SIZE).ok_or("Invalid page size")?;
    let sym = Symbolizer::with_page_size(store, page_size);

    match args[1].as_str() {
        "type" => {
            let tag: u16 = parse_arg(&args, 2, "tag")?;
            println!("{}", store.instance_type(tag)?);
        }
        "map" => {
            let space = args.get(2).ok_or("Missing space")?;
            let offset: u32 = parse_arg(&args, 3, "offset")?;
            let map = store.known_map(space, offset)?;
            println!(
                "{} ({})",
                map.name,
                sym.format_instance_type(map.instance_type)
            );
        }
        "object" => {
            let space = args.get(2).ok_or("Missing space")?;
            let offset: u32 = parse_arg(&args, 3, "offset")?;
            println!("{}", store.known_object(space, offset)?);
        }
        "space" => {
            let address: u64 = parse_arg(&args, 2, "address")?;
            println!("{}", store.classify_space(address)?);
        }
        "address" => {
            let address: u64 = parse_arg(&args, 2, "address")?;
            println!("{}", sym.format_address(address));
        }
        "frame" => {
            let code: usize = parse_arg(&args, 2, "frame marker")?;
            println!("{}", store.frame_marker(code)?);
        }
        "listing" => print!("{}", store),
        "export" => print!("{}", store.to_toml()?),
        other => {
            eprintln!("Error: Unknown command '{}'", other);
            eprintln!();
            print_usage(&program);
            std::process::exit(1);
        }
    }

    Ok(())
}
