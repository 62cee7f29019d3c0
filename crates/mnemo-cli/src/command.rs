use std::fmt;

use anyhow::{Context as _, bail, ensure};
use clap::{Args, Parser, Subcommand};
use mnemo_engine::{
    AnswerSheet, CellPos, CubeWeights, Face, FaceAnswer, GridWeights, Score, Scoreable, Session,
    SessionSeed, Transformable, VoxelPos,
};
use serde::Serialize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Which puzzle domain to run
    #[command(subcommand)]
    domain: Domain,
}

#[derive(Debug, Clone, Subcommand)]
enum Domain {
    /// 3x3 numbered grid
    Grid(GridArg),
    /// Six-faced die orientation
    Die(DieArg),
    /// 3x3x3 cube of numbered blocks
    Cube(CubeArg),
}

#[derive(Debug, Clone, Args)]
struct CommonArg {
    /// Number of transformation commands to generate
    #[arg(long, default_value_t = 5)]
    steps: usize,
    /// 32-hex-digit session seed (random when omitted, always echoed)
    #[arg(long)]
    seed: Option<SessionSeed>,
    /// Dump the session as JSON instead of the text audit trail
    #[arg(long)]
    json: bool,
}

impl CommonArg {
    fn seed(&self) -> SessionSeed {
        self.seed.unwrap_or_else(SessionSeed::random)
    }
}

#[derive(Debug, Clone, Args)]
struct GridArg {
    #[clap(flatten)]
    common: CommonArg,
    /// Start from a seeded random permutation instead of the ordered grid
    #[arg(long)]
    shuffled: bool,
    /// Weight of the rotate command in the draw
    #[arg(long, default_value_t = GridWeights::default().rotate)]
    rotate_weight: u32,
    /// Weight of the swap command in the draw
    #[arg(long, default_value_t = GridWeights::default().swap)]
    swap_weight: u32,
    /// Weight of the mirror command in the draw
    #[arg(long, default_value_t = GridWeights::default().mirror)]
    mirror_weight: u32,
    /// Weight of the set-row command in the draw
    #[arg(long, default_value_t = GridWeights::default().set_row)]
    set_row_weight: u32,
    /// Reconstruction to score: 9 comma-separated entries, row-major,
    /// empty entries allowed
    #[arg(long)]
    answer: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct DieArg {
    #[clap(flatten)]
    common: CommonArg,
    /// Face query to score, e.g. `top=5`
    #[arg(long)]
    answer: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct CubeArg {
    #[clap(flatten)]
    common: CommonArg,
    /// Weight of the rotate command in the draw
    #[arg(long, default_value_t = CubeWeights::default().rotate)]
    rotate_weight: u32,
    /// Weight of the laser commands in the draw
    #[arg(long, default_value_t = CubeWeights::default().laser)]
    laser_weight: u32,
    /// Reconstruction to score: 27 comma-separated entries in x-then-y-then-z
    /// scan order, empty entries for destroyed blocks
    #[arg(long)]
    answer: Option<String>,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.domain {
        Domain::Grid(arg) => run_grid(&arg),
        Domain::Die(arg) => run_die(&arg),
        Domain::Cube(arg) => run_cube(&arg),
    }
}

fn run_grid(arg: &GridArg) -> anyhow::Result<()> {
    let weights = GridWeights {
        rotate: arg.rotate_weight,
        swap: arg.swap_weight,
        mirror: arg.mirror_weight,
        set_row: arg.set_row_weight,
    };
    ensure!(
        u64::from(weights.rotate)
            + u64::from(weights.swap)
            + u64::from(weights.mirror)
            + u64::from(weights.set_row)
            > 0,
        "at least one grid command weight must be positive"
    );
    let seed = arg.common.seed();
    let mut session = if arg.shuffled {
        Session::shuffled_grid(seed, arg.common.steps, &weights)
    } else {
        Session::ordered_grid(seed, arg.common.steps, &weights)
    };
    let score = arg
        .answer
        .as_deref()
        .map(|answer| {
            let sheet = parse_sheet(answer, 9, CellPos::all())?;
            submit(&mut session, &sheet)
        })
        .transpose()?;
    print_session(&session, score, arg.common.json)
}

fn run_die(arg: &DieArg) -> anyhow::Result<()> {
    let mut session = Session::die(arg.common.seed(), arg.common.steps);
    let score = arg
        .answer
        .as_deref()
        .map(|answer| {
            let answer = parse_face_answer(answer)?;
            submit(&mut session, &answer)
        })
        .transpose()?;
    print_session(&session, score, arg.common.json)
}

fn run_cube(arg: &CubeArg) -> anyhow::Result<()> {
    let weights = CubeWeights {
        rotate: arg.rotate_weight,
        laser: arg.laser_weight,
    };
    ensure!(
        u64::from(weights.rotate) + u64::from(weights.laser) > 0,
        "at least one cube command weight must be positive"
    );
    let mut session = Session::cube(arg.common.seed(), arg.common.steps, &weights);
    let score = arg
        .answer
        .as_deref()
        .map(|answer| {
            let sheet = parse_sheet(answer, 27, VoxelPos::all())?;
            submit(&mut session, &sheet)
        })
        .transpose()?;
    print_session(&session, score, arg.common.json)
}

/// Parses a comma-separated reconstruction into an answer sheet, pairing
/// entries with positions in the domain's documented scan order.
fn parse_sheet<K: Eq + std::hash::Hash>(
    answer: &str,
    expected: usize,
    positions: impl Iterator<Item = K>,
) -> anyhow::Result<AnswerSheet<K>> {
    let entries: Vec<&str> = answer.split(',').collect();
    ensure!(
        entries.len() == expected,
        "expected {expected} comma-separated entries, got {}",
        entries.len()
    );
    let mut sheet = AnswerSheet::new();
    for (pos, entry) in positions.zip(entries) {
        sheet.set(pos, entry);
    }
    Ok(sheet)
}

fn parse_face_answer(answer: &str) -> anyhow::Result<FaceAnswer> {
    let Some((face, entry)) = answer.split_once('=') else {
        bail!("expected `face=value`, e.g. `top=5`, got `{answer}`");
    };
    let face = Face::from_str_opt(face.trim())
        .with_context(|| format!("unknown face `{face}`, expected top/bottom/front/back/left/right"))?;
    Ok(FaceAnswer {
        face,
        entry: entry.trim().to_owned(),
    })
}

fn submit<S: Transformable + Scoreable>(
    session: &mut Session<S>,
    answer: &S::Answer,
) -> anyhow::Result<Score> {
    session.submit(answer).context("scoring failed")
}

#[derive(Debug, Serialize)]
struct SessionRecord<'a, S: Serialize> {
    seed: SessionSeed,
    steps: &'a [mnemo_engine::ReplayStep<S>],
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<Score>,
}

fn print_session<S>(session: &Session<S>, score: Option<Score>, json: bool) -> anyhow::Result<()>
where
    S: Transformable + Serialize + fmt::Display,
{
    if json {
        let record = SessionRecord {
            seed: session.seed(),
            steps: session.replay().steps(),
            score,
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("seed: {}", session.seed());
    for step in session.replay().steps() {
        println!();
        println!("step {}: {}", step.index(), step.description());
        println!("{}", step.snapshot());
    }
    println!();
    println!("final:");
    println!("{}", session.final_state());
    if let Some(score) = score {
        println!();
        println!("score: {score}");
    }
    Ok(())
}
