//! Folio CLI: print the page layout of a plain text file
//!
//! Usage: `folio [page-setup.json] [text-file]`
//! The main interface is through the library and WASM bindings.

use std::env;
use std::fs;
use std::process::ExitCode;

use folio::{
    FontMetrics, PageSetup, PlainTextLayout, Presentation, PresentationConfig, PrintOptions,
    WrapMode,
};

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let page_setup = match args.first() {
        Some(path) => PageSetup::from_json(&fs::read_to_string(path)?)?,
        None => PageSetup::default(),
    };
    let text = match args.get(1) {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };

    let config = PresentationConfig {
        page_setup,
        wrap_mode: WrapMode::WrapToPage,
        ..PresentationConfig::default()
    };
    let engine = PlainTextLayout::new(text, FontMetrics::default());
    let mut presentation = Presentation::new(engine, config, ())?;

    let container = presentation.container();
    let content = container.document_size_in_page()?;
    println!("Folio page layout");
    println!("=================");
    println!(
        "Paper: {} x {} pt, content {} x {} pt, {:?}",
        page_setup.paper_size.width,
        page_setup.paper_size.height,
        content.width,
        content.height,
        container.orientation()
    );
    println!("Text extent: {} pt", container.document_extent());

    let count = presentation.number_of_pages()?;
    let total = presentation.total_size()?;
    println!("Pages: {} (total {} x {} pt)", count, total.width, total.height);
    for index in 0..count {
        let rect = presentation.container().page_rect_for_page(index)?;
        println!("  page {:>3}: origin ({}, {})", index + 1, rect.x, rect.y);
    }

    let options = PrintOptions {
        page_numbering: true,
        ..PrintOptions::default()
    };
    let layout = presentation.print(&options)?;
    println!("Print: {} pages", layout.page_count());
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("folio: {}", err);
            ExitCode::FAILURE
        }
    }
}
