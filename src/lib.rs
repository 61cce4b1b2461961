//! menugrid - Weekly menu grid parser and daily menu generator
//!
//! This crate reads a weekly menu grid (a Word table or an Excel sheet with seven
//! day-columns and a fixed set of meal-slot rows) and derives three views for each day:
//! a Standard menu, a Vegan menu and an Allergens declaration table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use menugrid::MenuGeneratorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a generator with default settings
//!     let generator = MenuGeneratorBuilder::new().build()?;
//!
//!     // Parse the weekly grid and generate all seven days
//!     let days = generator.generate(File::open("weekly.docx")?)?;
//!
//!     // Render each day as Markdown
//!     for day in &days {
//!         let output = File::create(format!("{}.md", day.header.file_slug()))?;
//!         generator.render(day, output)?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Selecting a Day
//!
//! ```rust,no_run
//! use std::fs::File;
//! use chrono::NaiveDate;
//! use menugrid::{DaySelector, MenuGeneratorBuilder, OutputFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let date = NaiveDate::from_ymd_opt(2025, 9, 18).ok_or("bad date")?;
//!     let generator = MenuGeneratorBuilder::new()
//!         .with_day_selector(DaySelector::Date(date))
//!         .with_output_format(OutputFormat::Json)
//!         .build()?;
//!
//!     let days = generator.generate(File::open("weekly.docx")?)?;
//!     println!("{}", generator.render_to_string(&days[0])?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Working Without a Document
//!
//! The transformation core only needs a [`grid::GridSource`]. An in-memory
//! [`grid::WeekGrid`] can be parsed directly:
//!
//! ```rust
//! use menugrid::grid::WeekGrid;
//! use menugrid::MenuGeneratorBuilder;
//!
//! # fn main() -> Result<(), menugrid::MenuGridError> {
//! let mut grid = WeekGrid::from_rows(vec![vec![String::new(); 8]; 18]);
//! grid.set(0, 1, "Monday");
//! grid.set(1, 1, "15/09/2025");
//! grid.set(3, 1, "Chef's choice soup\nCelery, Milk");
//!
//! let generator = MenuGeneratorBuilder::new().build()?;
//! let week = generator.parse_grid(&grid)?;
//! let menus = generator.generate_day(&week.days[0]);
//! assert_eq!(menus.vegan.supper.starter.allergens, "Celery");
//! # Ok(())
//! # }
//! ```

pub mod allergen;
pub mod assembler;
pub mod grid;
pub mod parser;
pub mod text;
pub mod views;

mod api;
mod builder;
mod error;
mod output;
mod security;
mod types;

// 公開API
pub use allergen::{AllergenCategory, AllergenSet};
pub use api::{DaySelector, GridLayout, InputFormat, OutputFormat, ViewKind};
pub use builder::{DayMenus, MenuGenerator, MenuGeneratorBuilder};
pub use error::MenuGridError;
pub use types::{
    AllergenTableRow, DayHeader, DayRecord, DisplayContext, DisplayItem, DisplayLunch,
    DisplaySupper, DisplayText, LunchSource, MenuItem, SourceMenus, SupperSource, Week,
};
