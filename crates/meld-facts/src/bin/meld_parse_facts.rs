use std::{env, fs};

use meld_facts::digest::database_digest_v1;
use meld_facts::parse_text;

fn main() {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: meld_parse_facts <dump.txt>");
        std::process::exit(2);
    };
    if args.next().is_some() {
        eprintln!("usage: meld_parse_facts <dump.txt>");
        std::process::exit(2);
    }

    let text = match fs::read_to_string(&path) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("failed to read `{path}`: {err}");
            std::process::exit(2);
        }
    };

    match parse_text(&text, None) {
        Ok(db) => {
            println!(
                "ok: nodes={} facts={} digest={}",
                db.len(),
                db.fact_count(),
                database_digest_v1(&db)
            );
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
