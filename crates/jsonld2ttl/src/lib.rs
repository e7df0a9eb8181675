/*!
JSON-LD to Turtle converter

Converts JSON-LD documents to Turtle with a stable, collision-free prefix
block. Fields that no context maps are kept under a placeholder namespace and
reported, instead of being silently dropped.

```no_run
use jsonld2ttl::{Converter, config::ConverterConfigBuilder};

# async fn run() -> Result<(), jsonld2ttl::errors::Jsonld2TtlError> {
let converter = Converter::new(ConverterConfigBuilder::default().build()).await?;
let turtle = converter.convert_file("annotation.jsonld").await?;
println!("{turtle}");
# Ok(())
# }
```

Remote context prefixes are cached on disk (see [cache::NamespaceCache]), so
repeated conversions of documents sharing a context need no network access
for prefix extraction.
*/

pub mod cache;
pub mod config;
pub mod enhance;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod merge;
pub mod pipeline;
pub mod redirect;

pub use cache::NamespaceCache;
pub use enhance::{ContextEntry, EnhancedDocument, enhance};
pub use errors::Jsonld2TtlError;
pub use extractor::NamespaceExtractor;
pub use fetcher::ContextFetcher;
pub use jsonld2ttl_rdf::PrefixMap;
pub use merge::{merge, merge_all};
pub use pipeline::{Converter, apply_type_shorthand};
pub use redirect::RedirectResolver;
