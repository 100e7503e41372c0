use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chajda::{
    compile,
    nlp::{
        detect_language, lemmatizer::SurfaceLemmatizer, synonyms::SynonymAugmenter, Augmenter,
        MULTILINGUAL,
    },
    tsvector::{to_tsvector, tsvector_to_ngrams, tsvector_to_wordcontext},
    Config,
};
use clap::AppSettings;
use structopt::StructOpt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Language value that asks for detection from the input text
const AUTO_LANG: &str = "auto";

#[derive(StructOpt, Debug)]
#[structopt(
    name = "chajda",
    about = "Compile search queries and documents for postgres full text search",
    setting = AppSettings::SubcommandRequiredElseHelp
)]
enum Command {
    /// Compile a search query, printing the result as JSON
    Tsquery {
        #[structopt(flatten)]
        opts: NormalizeOpts,
        /// JSON synonym table; enables augmentation
        #[structopt(long, parse(from_os_str))]
        synonyms: Option<PathBuf>,
        /// Maximum synonyms added per term
        #[structopt(long, default_value = "5")]
        limit: usize,
        query: String,
    },
    /// Normalize a document into a tsvector string
    Tsvector {
        #[structopt(flatten)]
        opts: NormalizeOpts,
        text: String,
    },
    /// Print the n-grams of a tsvector, one per line
    Ngrams {
        /// Longest n-gram to emit
        #[structopt(short, default_value = "2")]
        n: usize,
        /// Drop repeated n-grams
        #[structopt(long)]
        uniq: bool,
        tsv: String,
    },
    /// Print `focus<TAB>context<TAB>count` rows for the words of a tsvector
    Wordcontext {
        /// Longest focus n-gram
        #[structopt(short, default_value = "1")]
        n: usize,
        /// Context words taken on each side of the focus
        #[structopt(long, default_value = "2")]
        window: usize,
        tsv: String,
    },
}

#[derive(StructOpt, Debug)]
struct NormalizeOpts {
    /// Language code, or `auto` to detect it from the input
    #[structopt(long, default_value = "auto")]
    lang: String,
    /// JSON config file, otherwise read from CHAJDA_* environment variables
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// JSON lemma table of `{"word": "lemma"}` pairs
    #[structopt(long, parse(from_os_str))]
    lemmas: Option<PathBuf>,
}

impl NormalizeOpts {
    fn lang_for(&self, text: &str) -> String {
        if self.lang != AUTO_LANG {
            return self.lang.clone();
        }
        detect_language(text).unwrap_or_else(|| {
            warn!("Could not detect the language of {:?}, using {}", text, MULTILINGUAL);
            MULTILINGUAL.to_string()
        })
    }

    fn config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(Config::from_env()),
        }
    }

    fn lemmatizer(&self) -> Result<SurfaceLemmatizer> {
        match &self.lemmas {
            Some(path) => SurfaceLemmatizer::from_path(path)
                .with_context(|| format!("Failed to load lemmas from {}", path.display())),
            None => Ok(SurfaceLemmatizer::new()),
        }
    }
}

fn load_synonyms(path: &Path, limit: usize) -> Result<SynonymAugmenter> {
    let augmenter = SynonymAugmenter::from_path(path)
        .with_context(|| format!("Failed to load synonyms from {}", path.display()))?;
    Ok(augmenter.with_limit(limit))
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Tsquery {
            opts,
            synonyms,
            limit,
            query,
        } => {
            let lang = opts.lang_for(&query);
            let config = opts.config()?;
            let lemmatizer = opts.lemmatizer()?;
            let augmenter = match &synonyms {
                Some(path) => Some(load_synonyms(path, limit)?),
                None => None,
            };
            let compiled = compile(
                &lang,
                &query,
                augmenter.as_ref().map(|a| a as &dyn Augmenter),
                &config,
                &lemmatizer,
            )
            .with_context(|| format!("Failed to compile {:?}", query))?;
            Ok(serde_json::to_string_pretty(&compiled)?)
        }
        Command::Tsvector { opts, text } => {
            let lang = opts.lang_for(&text);
            let config = opts.config()?;
            let lemmatizer = opts.lemmatizer()?;
            to_tsvector(&lang, &text, &config, &lemmatizer)
                .ok_or_else(|| anyhow!("Failed to normalize text for language {:?}", lang))
        }
        Command::Ngrams { n, uniq, tsv } => Ok(tsvector_to_ngrams(&tsv, n, uniq).join("\n")),
        Command::Wordcontext { n, window, tsv } => {
            let rows: Vec<String> = tsvector_to_wordcontext(&tsv, n, window)
                .into_iter()
                .map(|(focus, context, count)| format!("{}\t{}\t{}", focus, context, count))
                .collect();
            Ok(rows.join("\n"))
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = run(Command::from_args())?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run_args(args: &[&str]) -> Result<String> {
        let command = Command::from_iter_safe(std::iter::once("chajda").chain(args.iter().copied()))?;
        run(command)
    }

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_tsquery_prints_json() {
        let output = run_args(&["tsquery", "--lang", "xx", "t1 (t2 | t3) k:v"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["match_expression"], "t1 & (t2 | t3)");
        assert_eq!(
            json["filter_tree"],
            serde_json::json!({"and": [{"filter": {"key": "k", "value": "v"}}]})
        );
    }

    #[test]
    fn test_tsquery_with_lemmas_and_synonyms() {
        let lemmas = json_file(r#"{"cars": "car"}"#);
        let synonyms = json_file(r#"{"xx": {"car": ["auto", "automobile", "vehicle"]}}"#);
        let output = run_args(&[
            "tsquery",
            "--lang",
            "xx",
            "--lemmas",
            lemmas.path().to_str().unwrap(),
            "--synonyms",
            synonyms.path().to_str().unwrap(),
            "--limit",
            "2",
            "cars",
        ])
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["match_expression"], "car:A | auto:B | automobile:B");
        assert_eq!(
            json["augmented_terms"],
            serde_json::json!({"car": ["auto", "automobile"]})
        );
    }

    #[test]
    fn test_tsquery_syntax_error_fails() {
        assert!(run_args(&["tsquery", "--lang", "xx", "(t1"]).is_err());
    }

    #[test]
    fn test_tsvector_with_config_file() {
        let config = json_file(r#"{"max_lemma_size": 4}"#);
        let output = run_args(&[
            "tsvector",
            "--lang",
            "xx",
            "--config",
            config.path().to_str().unwrap(),
            "Fancy apple pie",
        ])
        .unwrap();
        assert_eq!(output, "fanc:1 appl:2 pie:3");
    }

    #[test]
    fn test_invalid_config_file_fails() {
        let config = json_file("not json");
        assert!(run_args(&[
            "tsvector",
            "--lang",
            "xx",
            "--config",
            config.path().to_str().unwrap(),
            "text",
        ])
        .is_err());
    }

    #[test]
    fn test_ngrams() {
        let output = run_args(&["ngrams", "-n", "2", "--uniq", "a:1 b:2 a:4 b:5"]).unwrap();
        assert_eq!(output, "a\nb\na b");
    }

    #[test]
    fn test_wordcontext() {
        let output =
            run_args(&["wordcontext", "-n", "2", "--window", "1", "aaa:1 bbb:2"]).unwrap();
        assert_eq!(output, "aaa\tbbb\t1\nbbb\taaa\t1");
    }
}
