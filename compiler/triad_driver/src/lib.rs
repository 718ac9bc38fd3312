use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser as ClapParser};
use itertools::Itertools;
use thiserror::Error;

use ast::Expr;
use lexer::{LexError, Token};
use parser::{ParseError, Parser};
use tac::{debug_tac, eval, gen_tac, EvalError, Program};

/// Input compiled when neither a file nor `--expr` is given
pub const DEMO_SOURCE: &str = "4+7*14+(7+6)*3";

#[derive(ClapParser, Debug)]
#[command(
    version,
    about,
    long_about = "Lowers an arithmetic expression to three-address code"
)]
struct CLI {
    /// Path to a source file containing one expression
    path: Option<String>,

    /// Expression text to compile instead of a file
    #[arg(short, long, conflicts_with = "path")]
    expr: Option<String>,

    /// "Specifies a point in compilation process to stop, only one(1) option can be specified at a time"
    #[command(flatten)]
    stage_options: StageOptions,

    /// Reject tokens left over after the expression
    #[arg(long)]
    strict: bool,

    /// Interpret the generated code and print its value
    #[arg(long)]
    eval: bool,

    /// Write the three-address listing to a .tac file
    #[arg(short = 'd')]
    debug: bool,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct StageOptions {
    /// Stop after lexer
    #[arg(long)]
    lex: bool,

    /// Stop after parser
    #[arg(long)]
    parse: bool,

    /// Stop after three-address code generation
    #[arg(long)]
    tac: bool,
}

/// Which stage the compiler should stop at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStage {
    Lexer,
    Parser,
    Tac,
}

impl StopStage {
    fn from_args(options: &StageOptions) -> Option<StopStage> {
        if options.lex {
            Some(StopStage::Lexer)
        } else if options.parse {
            Some(StopStage::Parser)
        } else if options.tac {
            Some(StopStage::Tac)
        } else {
            None
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileErr {
    #[error("Lexer encountered an error: {0}")]
    Lexer(#[from] LexError),
    #[error("Parser encountered an error: {0}")]
    Parser(#[from] ParseError),
    #[error("Evaluation failed: {0}")]
    Eval(#[from] EvalError),
}

/// Output of every stage that ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub ast: Option<Expr>,
    pub program: Option<Program>,
}

pub fn main() -> Result<()> {
    let args = CLI::parse();

    let stop_stage = StopStage::from_args(&args.stage_options);

    run_driver(&args, stop_stage)
}

fn run_driver(args: &CLI, stop_stage: Option<StopStage>) -> Result<()> {
    let (source, origin) = match (&args.path, &args.expr) {
        (Some(path), _) => (
            read_to_string(path).with_context(|| format!("Unable to read source file: {}", path))?,
            path.clone(),
        ),
        (None, Some(expr)) => (expr.clone(), "<expr>".to_string()),
        (None, None) => (DEMO_SOURCE.to_string(), "<demo>".to_string()),
    };

    let compilation = compile_source(&source, stop_stage, args.strict)
        .with_context(|| format!("Failed to compile {}", origin))?;

    println!("Tokens:\n{}", format_tokens(&compilation.tokens));

    if let Some(ast) = &compilation.ast {
        println!("\nAST:\n{:#?}\n{}", ast, ast);
    }

    let program = match &compilation.program {
        Some(program) => program,
        None => return Ok(()),
    };

    println!("\nThree-address code:");
    for line in program.lines() {
        println!("{}", line);
    }

    if args.debug {
        let tac_path = debug_path(args.path.as_deref());
        debug_tac(program, &tac_path.to_string_lossy())
            .with_context(|| format!("Unable to write {}", tac_path.display()))?;
    }

    if args.eval {
        let value = eval(program).map_err(CompileErr::from)?;
        println!("\n{} = {}", program.result, value);
    }

    Ok(())
}

/// Runs lexer, parser and code generator in order, stopping after `stop_stage`.
/// `--tac` and no stop stage both run the whole pipeline.
pub fn compile_source(
    source: &str,
    stop_stage: Option<StopStage>,
    strict: bool,
) -> Result<Compilation, CompileErr> {
    let tokens = lexer::tokenize(source)?;

    if let Some(StopStage::Lexer) = stop_stage {
        return Ok(Compilation {
            tokens,
            ast: None,
            program: None,
        });
    }

    let mut parser = Parser::new(tokens.clone());
    let ast = if strict {
        parser.parse_complete()?
    } else {
        parser.parse()?
    };

    if let Some(StopStage::Parser) = stop_stage {
        return Ok(Compilation {
            tokens,
            ast: Some(ast),
            program: None,
        });
    }

    let program = gen_tac(&ast);

    Ok(Compilation {
        tokens,
        ast: Some(ast),
        program: Some(program),
    })
}

/// Renders tokens as `[(KIND, "text"), ...]`
pub fn format_tokens(tokens: &[Token]) -> String {
    let pairs = tokens
        .iter()
        .map(|t| format!("({}, {:?})", t.kind.name(), t.text))
        .join(", ");

    format!("[{}]", pairs)
}

/// Listing goes next to the source file, or `expr.tac` for inline input
fn debug_path(source_path: Option<&str>) -> PathBuf {
    match source_path {
        Some(path) => Path::new(path).with_extension("tac"),
        None => PathBuf::from("expr.tac"),
    }
}
