/*!
# Catalog Filler

A small web tool that fills the catalog metadata columns of a product
spreadsheet, built in Rust.

## Overview

A user uploads an `.xlsx` sheet holding an identifier column (an internal
merchant code or a catalog SKU-like code) and a "color/size" spec column.
Five columns are derived for every row and written into the sheet's own
target headers, then the result is previewed in the browser and offered
for download.

## Architecture

### Extraction Layer
- **Identifier Picker** (`picker`) - preferred identifier column with fallback
- **Field Extractor** (`extract`) - style code, color, size, image code and
  the constant process label, each rule chosen by configuration
- **Header Resolver** (`header`) - header text to 1-based column position
- **Row Writer** (`writer`) - writes derived values into resolved columns

### I/O Layer
- **Loader** (`loader`) - first worksheet of an upload, via calamine
- **Downloader** (`downloader`) - processed sheet back to `.xlsx`, via rust_xlsxwriter

### Web Layer (feature `web`)
- **App** (`app`) - axum routes for upload preview and download

## Derived Columns

| Field        | Source      | Rule                                               |
|--------------|-------------|----------------------------------------------------|
| style code   | identifier  | `A` + one digit (or digit run), default `A2`        |
| color / size | spec        | split on first `/`, else last `-`                  |
| image code   | identifier  | digits after `A<n>-`, `A<n>` prefix, leading digits |
| process type | -           | constant label                                     |

Every row also carries notes flagging which values are fallbacks, so a
defaulted `A2` never hides a malformed identifier.

## REST API Endpoints

- `GET /` - Upload page
- `GET /api/config` - Active column and rule configuration
- `POST /api/preview` - Processed rows with notes, as JSON
- `POST /api/process` - Processed workbook as a download
*/

pub mod config;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod header;
pub mod loader;
pub mod picker;
pub mod process;
pub mod sheet;
pub mod writer;

#[cfg(feature = "web")]
pub mod app;

pub use config::Config;
pub use error::{ConfigError, FillError};
pub use extract::{DerivedFields, RowNote, RowOutcome};
pub use process::{ProcessedWorkbook, process_workbook};
