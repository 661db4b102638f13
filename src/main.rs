use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use wikt_reader::{
    German, Lemma, PatternTable, StoreOptions, Wiktionary, WiktionaryStore, build_index,
    index_path_for,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!(
            "Usage: {} <DUMP.xml|--online> [WORD...] [--build-index] [--dump] [--categories]",
            args[0]
        );
        std::process::exit(1);
    }

    let source = &args[1];
    let rebuild = args.iter().any(|a| a == "--build-index");
    let dump = args.iter().any(|a| a == "--dump");
    let categories = args.iter().any(|a| a == "--categories");
    let words: Vec<&str> = args[2..]
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();

    if rebuild && source != "--online" {
        let corpus = Path::new(source);
        let index_path = index_path_for(corpus);
        let interval = StoreOptions::default().progress_interval;
        match build_index::<German>(corpus, &index_path, interval) {
            Ok(summary) => println!(
                "Index built: {} entries from {} lines ({} line endings)",
                summary.entries, summary.lines, summary.line_ending
            ),
            Err(e) => fail(&e),
        }
    }

    if categories && source != "--online" {
        list_categories(source);
        return;
    }

    run_queries(source, &words, dump);
}

fn list_categories(source: &str) {
    let mut store = match WiktionaryStore::<German>::open(source) {
        Ok(store) => store,
        Err(e) => fail(&e),
    };
    match store.category_names(&PatternTable::german()) {
        Ok(names) => {
            println!("Categories found in {} entries:", store.index().cached_keys());
            for name in names {
                println!("  {}", name);
            }
        }
        Err(e) => fail(&e),
    }
}

fn run_queries(source: &str, words: &[&str], dump: bool) {
    let opened = if source == "--online" {
        open_online()
    } else {
        Wiktionary::local(source)
    };
    let mut dict = match opened {
        Ok(dict) => dict,
        Err(e) => fail(&e),
    };

    if !words.is_empty() {
        for word in words {
            query(&mut dict, word, dump);
        }
        return;
    }

    println!("Wiktionary query (one word per line, Ctrl-D to quit)");
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => fail(&e),
        };
        let word = line.trim();
        if !word.is_empty() {
            query(&mut dict, word, dump);
        }
    }
}

#[cfg(feature = "remote")]
fn open_online() -> wikt_reader::Result<Wiktionary> {
    Wiktionary::remote()
}

#[cfg(not(feature = "remote"))]
fn open_online() -> wikt_reader::Result<Wiktionary> {
    eprintln!("ERROR: built without the 'remote' feature");
    std::process::exit(1);
}

fn query(dict: &mut Wiktionary, word: &str, dump: bool) {
    println!("{}", "=".repeat(60));
    match dict.query(word) {
        Ok(Some(lemma)) => {
            show(&lemma);
            if dump && !lemma.has_inflections() {
                let file_name = format!("wikitext_{}.txt", lemma.term);
                match fs::write(&file_name, &lemma.wikitext) {
                    Ok(()) => println!("Wikitext saved in: {}", file_name),
                    Err(e) => eprintln!("ERROR: could not write {}: {}", file_name, e),
                }
            }
        }
        Ok(None) => println!("Search term \"{}\" not found", word),
        Err(e) => eprintln!("ERROR: lookup of \"{}\" failed: {}", word, e),
    }
}

fn show(lemma: &Lemma) {
    let Some(root) = &lemma.root else {
        println!("Root of \"{}\" not found", lemma.term);
        return;
    };
    println!("Root Word: {}", root);
    if lemma.categories.is_empty() {
        println!("Category not found");
        return;
    }
    for category in &lemma.categories {
        println!("\nCategory: {}", category.name);
        if category.inflections.is_empty() {
            println!("  Inflection table not found");
        }
        for inflection in &category.inflections {
            println!("  {}: {}", inflection.name, inflection.value);
        }
        for translation in &category.translations {
            println!("  [{}] {}", translation.lang, translation.value);
        }
    }
}

fn fail(e: &dyn std::fmt::Display) -> ! {
    eprintln!("\nERROR: {}", e);
    std::process::exit(1);
}
