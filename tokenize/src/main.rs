//! 形態素解析を実行するユーティリティ
//!
//! このバイナリは、mecab-ko-dic 形式の辞書ディレクトリから辞書を構築し、
//! 標準入力から読み込んだテキストを形態素解析して、
//! 指定された出力形式（mecab、wakati、detail）で結果を出力します。

use std::error::Error;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use kolattice::{DecompoundMode, SystemDictionaryBuilder, Tokenizer};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Mecab,
    Wakati,
    Detail,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    /// 文字列から出力モードをパースする
    ///
    /// # 引数
    ///
    /// * `mode` - パース対象の文字列（"mecab"、"wakati"、"detail"のいずれか）
    ///
    /// # 戻り値
    ///
    /// パースに成功した場合は対応する `OutputMode`、失敗した場合はエラーメッセージ
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "mecab" => Ok(Self::Mecab),
            "wakati" => Ok(Self::Wakati),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "tokenize", about = "Predicts Korean morphemes")]
struct Args {
    /// Directory of mecab-ko-dic sources (*.csv, matrix.def, char.def, unk.def).
    #[clap(short = 'd', long)]
    dict_dir: PathBuf,

    /// User lexicon in the same csv format as the system lexicon.
    #[clap(short = 'u', long)]
    user_lexicon: Option<PathBuf>,

    /// Output mode. Choices are mecab, wakati, and detail.
    #[clap(short = 'O', long, default_value = "mecab")]
    output_mode: OutputMode,

    /// Decompound mode. Choices are none, discard, and mixed.
    #[clap(long, default_value = "discard")]
    decompound: DecompoundMode,

    /// Keeps punctuation and space tokens in the output.
    #[clap(long)]
    keep_punctuation: bool,

    /// Splits unknown words into single characters.
    #[clap(long)]
    unknown_unigrams: bool,
}

/// 辞書ディレクトリ内の `*.csv` をファイル名順に連結して読み込む
fn read_lexicon_sources(dict_dir: &Path) -> Result<String, Box<dyn Error>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dict_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(format!("no csv files in {}", dict_dir.display()).into());
    }

    let mut buf = String::new();
    for path in &paths {
        log::debug!("reading {}", path.display());
        buf.push_str(&fs::read_to_string(path)?);
        if !buf.ends_with('\n') {
            buf.push('\n');
        }
    }
    Ok(buf)
}

/// メイン関数
///
/// 辞書を構築し、標準入力から読み込んだテキストを1行ずつ形態素解析して、
/// 指定された形式で結果を標準出力に出力します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、エラーが発生した場合はエラー情報
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    log::info!("Loading the dictionary...");
    let lexicon = read_lexicon_sources(&args.dict_dir)?;
    let mut dict = SystemDictionaryBuilder::from_readers(
        lexicon.as_bytes(),
        File::open(args.dict_dir.join("matrix.def"))?,
        File::open(args.dict_dir.join("char.def"))?,
        File::open(args.dict_dir.join("unk.def"))?,
    )?;
    if let Some(path) = &args.user_lexicon {
        dict = dict.reset_user_lexicon_from_reader(Some(File::open(path)?))?;
    }

    let tokenizer = Tokenizer::new(dict)
        .decompound_mode(args.decompound)
        .discard_punctuation(!args.keep_punctuation)
        .output_unknown_unigrams(args.unknown_unigrams);
    let mut worker = tokenizer.new_worker();

    log::info!("Ready to tokenize");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        worker.reset_sentence(line);
        match args.output_mode {
            OutputMode::Mecab => {
                while let Some(t) = worker.next_token()? {
                    out.write_all(t.surface().as_bytes())?;
                    out.write_all(b"\t")?;
                    out.write_all(t.feature().as_bytes())?;
                    out.write_all(b"\n")?;
                }
                out.write_all(b"EOS\n")?;
            }
            OutputMode::Wakati => {
                let mut first = true;
                while let Some(t) = worker.next_token()? {
                    if !first {
                        out.write_all(b" ")?;
                    }
                    first = false;
                    out.write_all(t.surface().as_bytes())?;
                }
                out.write_all(b"\n")?;
            }
            OutputMode::Detail => {
                while let Some(t) = worker.next_token()? {
                    writeln!(
                        &mut out,
                        "{}\t{}\tlex_type={:?}\tpos={}/{}\tposInc={}\tposLen={}\toffsets={:?}",
                        t.surface(),
                        t.feature(),
                        t.lex_type(),
                        t.left_pos(),
                        t.right_pos(),
                        t.position_increment(),
                        t.position_length(),
                        t.range_char(),
                    )?;
                }
                out.write_all(b"EOS\n")?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
