use clap::{Args, Parser, Subcommand, ValueEnum};
use medsupport_common::Task;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medsupport")]
#[command(about = "医療AIアシスタントのクライアント（ノート構造化・レポート平易化・画像診断）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのベースURL（設定ファイルより優先）
    #[arg(long, global = true, env = "MEDSUPPORT_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clinical Scribe: 臨床ノートを構造化
    Scribe(TaskArgs),

    /// Patient Portal: 医療レポートを患者向けに平易化
    Explain(TaskArgs),

    /// Diagnostics Lab: 医用画像を解析し注目領域を表示
    Diagnose {
        /// 解析する画像
        #[arg(required = true)]
        image: PathBuf,

        /// 解析指示（省略時は既定プロンプト）
        #[arg(short, long)]
        prompt: Option<String>,

        /// 範囲外・反転した座標を補正して表示
        #[arg(long)]
        clamp_boxes: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// バックエンドの死活確認
    Health,

    /// 設定の表示・変更
    Config {
        /// ベースURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 順序が入れ替わったレスポンスの扱い
        #[arg(long)]
        set_ordering: Option<OrderingArg>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// テキスト・画像を受け付けるタスクの引数
#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// 入力テキスト
    #[arg(short, long)]
    pub text: Option<String>,

    /// 入力テキストをファイルから読む（`-` で標準入力）
    #[arg(long, conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    /// 添付画像
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// テキストを対話入力する
    #[arg(short, long, conflicts_with_all = ["text", "text_file"])]
    pub interactive: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// 出力形式 (markdown/html/text)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// 結果をファイルへ保存
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// バックエンドが返したmarkdownそのまま
    Markdown,
    /// HTML（画像診断は画像とオーバーレイ付き）
    Html,
    /// 端末向けプレーンテキスト
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderingArg {
    LatestRequest,
    LastSettled,
}

impl Commands {
    pub fn task(&self) -> Option<Task> {
        match self {
            Commands::Scribe(_) => Some(Task::ClinicalNote),
            Commands::Explain(_) => Some(Task::ReportSimplification),
            Commands::Diagnose { .. } => Some(Task::ImageDiagnostics),
            _ => None,
        }
    }
}
