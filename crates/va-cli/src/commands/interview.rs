use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use va_genai::{SpeechSynthesizer, TextGenerator};
use va_workflow::interview::{AudioSink, InterviewDriver, NoRecognizer};

use crate::audio::WavSink;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InterviewArgs;
use crate::context::AppContext;
use crate::output::output;

/// Typed by the founder to leave before the interviewer signs off.
const QUIT: &str = "/quit";

#[derive(Debug, Serialize)]
struct InterviewResponse {
    path: String,
    turns: usize,
    finished: bool,
    audio_files: Vec<String>,
}

/// Handle `vana interview`: a text-mode founder voice interview on the
/// terminal. Turns go to stderr; the transcript goes to `--out` or stdout.
pub async fn handle(args: &InterviewArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let collaborator = ctx.workflow.generator();
    let sink = WavSink::new(args.voice_out.clone()).context("failed to create --voice-out directory")?;
    let synthesizer = args.voice_out.as_ref().map(|_| collaborator);
    let mut driver = InterviewDriver::new(collaborator, synthesizer, sink, NoRecognizer);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stderr = std::io::stderr();
    if !flags.quiet {
        writeln!(stderr, "Type your answers and press Enter. '{QUIT}' ends the call early.")?;
    }
    converse(&mut driver, stdin, &mut stderr).await?;

    let source = driver.finish()?;
    let Some(path) = &args.out else {
        println!("{}", source.content);
        return Ok(());
    };

    std::fs::write(path, &source.content)
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;
    output(
        &InterviewResponse {
            path: path.display().to_string(),
            turns: driver.interview().transcript.len(),
            finished: driver.interview().is_finished(),
            audio_files: driver
                .sink()
                .written()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        },
        flags.format,
    )
}

/// Run the interview until the interviewer signs off, the founder quits,
/// or input ends. Every new transcript line and notice is echoed to `out`.
async fn converse<G, S, A, I, W>(
    driver: &mut InterviewDriver<'_, G, S, A, NoRecognizer>,
    input: I,
    out: &mut W,
) -> anyhow::Result<()>
where
    G: TextGenerator,
    S: SpeechSynthesizer,
    A: AudioSink,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut shown = 0;
    let mut last_error = None;

    driver.start().await?;
    echo(driver, &mut shown, &mut last_error, out)?;

    let mut lines = input.lines();
    while !driver.interview().can_complete() {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == QUIT {
            break;
        }
        if line.is_empty() || !driver.interview().accepts_text() {
            continue;
        }
        driver.say(line).await?;
        echo(driver, &mut shown, &mut last_error, out)?;
    }
    Ok(())
}

fn echo<G, S, A, W: Write>(
    driver: &InterviewDriver<'_, G, S, A, NoRecognizer>,
    shown: &mut usize,
    last_error: &mut Option<String>,
    out: &mut W,
) -> anyhow::Result<()>
where
    G: TextGenerator,
    S: SpeechSynthesizer,
    A: AudioSink,
{
    let interview = driver.interview();
    for item in interview.transcript.iter().skip(*shown) {
        writeln!(out, "{}: {}", item.speaker.as_str().to_uppercase(), item.text)?;
    }
    *shown = interview.transcript.len();

    if interview.error != *last_error {
        if let Some(error) = &interview.error {
            writeln!(out, "! {error}")?;
        }
        last_error.clone_from(&interview.error);
    }
    Ok(())
}
