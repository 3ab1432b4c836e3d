use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};

use fountain_doc::{parse_file, render_to_string, Conf, ConsoleDocumentRenderer, HtmlDocumentRenderer};

/// 渲染 Fountain 剧本：不指定输出文件时打印到终端，否则写出 HTML
#[derive(Parser, Debug)]
#[command(name = "fountain-render", version, about)]
struct Cli {
    /// Fountain 剧本文件
    script: PathBuf,

    /// HTML 输出文件
    out_file: Option<PathBuf>,

    /// 终端输出宽度
    #[arg(long)]
    width: Option<usize>,

    /// 即使没有标题页信息也打印标题页
    #[arg(long)]
    force_title_page: bool,

    /// 只输出 HTML 片段，不包含 <html>/<head>
    #[arg(long)]
    fragment: bool,

    /// 终端输出不带颜色
    #[arg(long)]
    no_color: bool,

    /// 输出文档的 JSON 结构
    #[arg(long)]
    json: bool,

    /// JSON 配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 日志详细程度（-v, -vv, -vvv）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn conf(&self) -> Result<Conf> {
        let mut conf = match &self.config {
            Some(path) => Conf::from_json_file(path)
                .with_context(|| format!("读取配置失败: {}", path.display()))?,
            None => Conf::default(),
        };
        if let Some(width) = self.width {
            conf.console_width = width;
        }
        if self.force_title_page {
            conf.print_title_page = true;
        }
        if self.fragment {
            conf.html_standalone = false;
        }
        if self.no_color {
            conf.use_colors = false;
        }
        conf.validate()?;
        Ok(conf)
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    debug!("命令行参数: {:?}", cli);

    let conf = cli.conf()?;
    let doc = parse_file(&cli.script)
        .with_context(|| format!("解析剧本失败: {}", cli.script.display()))?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    if cli.json {
        let json = serde_json::to_string_pretty(&doc).context("序列化 JSON 失败")?;
        writeln!(stdout, "{}", json)?;
        return Ok(());
    }

    match &cli.out_file {
        Some(out_file) => {
            let mut renderer = HtmlDocumentRenderer::new(conf);
            let html = render_to_string(&mut renderer, &doc)?;
            fs::write(out_file, html)
                .with_context(|| format!("写入 HTML 失败: {}", out_file.display()))?;
            info!("HTML 已保存到: {}", out_file.display());
        }
        None => {
            let mut renderer = ConsoleDocumentRenderer::new(conf);
            let text = render_to_string(&mut renderer, &doc)?;
            stdout.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}
