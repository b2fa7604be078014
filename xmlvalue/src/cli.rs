//! CLI argument parsing using clap

use clap::Parser;

/// Turn XML/HTML into an ordered JSON tree and query it
#[derive(Parser, Debug)]
#[command(name = "xmlvalue")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump a document as a JSON tree
    xmlvalue feed.xml

    # First <b x="2"> in each file
    xmlvalue "data/**/*.xml" -n b -a x=2 --one

    # Every <a> inside an HTML page, including nested ones
    curl -s https://example.com | xmlvalue --html -n a -r -o lines

    # CI: fail unless exactly one <config> element exists
    xmlvalue app.xml -n config -e 1
"#)]
pub struct Args {
    /// Files to process (supports glob patterns like "data/**/*.xml")
    #[arg()]
    pub files: Vec<String>,

    /// Tag name to look for
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Required attribute value (repeatable)
    #[arg(short = 'a', long = "attr", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub attributes: Vec<(String, String)>,

    /// Keep searching inside matched nodes
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Stop after N matches
    #[arg(long = "max")]
    pub max: Option<usize>,

    /// Only the first match per document
    #[arg(long = "one", conflicts_with_all = ["recursive", "max"])]
    pub one: bool,

    /// Output format: json (default), lines, content, count
    #[arg(short = 'o', long = "output", default_value = "json")]
    pub output: String,

    /// Parse as HTML (void elements, unclosed tags, illegal characters)
    #[arg(long = "html")]
    pub html: bool,

    /// Resolve namespaces (local names plus namespaceURI/qualifiedName)
    #[arg(long = "namespaces")]
    pub namespaces: bool,

    /// Strip characters that are illegal in XML before parsing
    #[arg(long = "sanitize")]
    pub sanitize: bool,

    /// Expected result: none, some, or a number (exit 1 if not met)
    #[arg(short = 'e', long = "expect")]
    pub expect: Option<String>,

    /// Number of parallel workers
    #[arg(short = 'c', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Show verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parse a `KEY=VALUE` pair
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid attribute '{}': expected KEY=VALUE", s))?;
    if key.is_empty() {
        return Err(format!("invalid attribute '{}': empty key", s));
    }
    Ok((key.to_string(), value.to_string()))
}
