use std::io::{self, BufRead, Write};

use anyhow::Context as _;
use whodunit_engine::{
    CaseSeed, EngineError, GameSession, GuessOutcome, Suspect, SuspectMap, Weapon,
};

use super::GameConfigArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameConfigArg,
    /// Replay a specific case (32-digit hex seed)
    #[clap(long)]
    seed: Option<CaseSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { game, seed } = arg;

    let config = game.resolve()?;
    let session = match seed {
        Some(seed) => GameSession::with_seed(config, *seed),
        None => GameSession::start(config),
    }
    .context("Failed to open a case")?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Console::new(stdin, stdout).play(session)?;
    Ok(())
}

/// How a terminal game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Solved,
    Exhausted,
    Expired,
    Abandoned,
}

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: BufRead,
    W: Write,
{
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed line. `None` on end of input.
    fn prompt(&mut self, message: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{message} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn print_beliefs(&mut self, beliefs: &SuspectMap<f64>) -> io::Result<()> {
        for (suspect, p) in beliefs.iter() {
            writeln!(self.output, "    {:<13} {:>5.1}%", suspect.name(), p * 100.0)?;
        }
        Ok(())
    }

    /// Prints the reveal when `err` ended the case.
    fn report(&mut self, err: &EngineError) -> anyhow::Result<Option<Ending>> {
        writeln!(self.output, "! {err}")?;
        Ok(err.is_session_expired().then_some(Ending::Expired))
    }

    fn play(&mut self, mut session: GameSession) -> anyhow::Result<Ending> {
        writeln!(self.output, "Case {} is open.", session.seed())?;

        if let Some(ending) = self.interview(&mut session)? {
            return Ok(ending);
        }
        if let Some(ending) = self.alibis(&mut session)? {
            return Ok(ending);
        }
        if let Some(ending) = self.verify(&mut session)? {
            return Ok(ending);
        }
        if let Some(ending) = self.deduce(&mut session)? {
            return Ok(ending);
        }
        self.accuse(&mut session)
    }

    fn interview(&mut self, session: &mut GameSession) -> anyhow::Result<Option<Ending>> {
        let dossiers = match session.interview() {
            Ok(dossiers) => dossiers,
            Err(err) => return self.report(&err),
        };
        writeln!(self.output, "\n== Round 1: interviews ==")?;
        for (_, d) in dossiers.iter() {
            writeln!(
                self.output,
                "{} ({}), {}, {} hair, {} eyes, {}.\n    Motive: {}. Says they were at the {}.",
                d.name, d.age, d.height, d.hair_color, d.eye_color, d.occupation, d.motive,
                d.claimed_location,
            )?;
        }
        Ok(None)
    }

    fn alibis(&mut self, session: &mut GameSession) -> anyhow::Result<Option<Ending>> {
        let claims = match session.publish_alibis() {
            Ok(claims) => claims.clone(),
            Err(err) => return self.report(&err),
        };
        writeln!(self.output, "\n== Round 2: alibis ==")?;
        for (accuser, seen) in claims.iter() {
            let seen = seen
                .iter()
                .map(|claim| format!("{} at the {}", claim.target, claim.location))
                .collect::<Vec<_>>()
                .join("; ");
            writeln!(self.output, "{accuser} saw {seen}.")?;
        }
        Ok(None)
    }

    fn verify(&mut self, session: &mut GameSession) -> anyhow::Result<Option<Ending>> {
        writeln!(self.output, "\n== Round 3: verification ==")?;
        while session.checked_suspects().len() < Suspect::LEN {
            let Some(line) = self.prompt("Verify whom? (blank to move on)")? else {
                break;
            };
            if line.is_empty() {
                break;
            }
            let suspect = match line.parse::<Suspect>() {
                Ok(suspect) => suspect,
                Err(err) => {
                    writeln!(self.output, "! {err}")?;
                    continue;
                }
            };
            let report = match session.verify_alibi(suspect) {
                Ok(report) => report,
                Err(err) => match self.report(&err)? {
                    Some(ending) => return Ok(Some(ending)),
                    None => continue,
                },
            };

            let verification = &report.verification;
            let verdict = if verification.is_alibi_valid {
                "holds"
            } else {
                "is false"
            };
            writeln!(
                self.output,
                "{suspect}'s alibi {verdict}: claimed {}, was at the {}.",
                verification.claimed_location, verification.actual_location
            )?;
            for statement in &verification.statements {
                let mark = if statement.is_correct { "told the truth" } else { "lied" };
                writeln!(self.output, "    {} {mark}.", statement.accuser)?;
            }
            if let Some(next) = report.suggestion {
                writeln!(self.output, "    Most talked about: {next}.")?;
            }
            self.print_beliefs(&report.beliefs)?;
        }
        Ok(None)
    }

    fn deduce(&mut self, session: &mut GameSession) -> anyhow::Result<Option<Ending>> {
        let deduction = match session.final_deduction() {
            Ok(deduction) => deduction,
            Err(err) => return self.report(&err),
        };
        writeln!(self.output, "\n== Round 4: final deduction ==")?;
        for ranked in &deduction.top_suspects {
            let fits = if ranked.csp_valid { ", fits the scene" } else { "" };
            writeln!(
                self.output,
                "    {} {:.1}%{fits}",
                ranked.suspect,
                ranked.probability * 100.0
            )?;
        }
        writeln!(self.output, "Forensics: {}", deduction.weapon_clue)?;
        Ok(None)
    }

    fn accuse(&mut self, session: &mut GameSession) -> anyhow::Result<Ending> {
        loop {
            let tries = session.tries_remaining();
            let Some(line) = self.prompt(&format!("Accuse (suspect, weapon) [{tries} left]:"))?
            else {
                writeln!(self.output, "The case goes cold. It was {}.", session.solution())?;
                return Ok(Ending::Abandoned);
            };
            let Some((suspect, weapon)) = line.split_once(',') else {
                writeln!(self.output, "! expected 'suspect, weapon'")?;
                continue;
            };
            let parsed = suspect
                .parse::<Suspect>()
                .and_then(|suspect| Ok((suspect, weapon.parse::<Weapon>()?)));
            let (suspect, weapon) = match parsed {
                Ok(guess) => guess,
                Err(err) => {
                    writeln!(self.output, "! {err}")?;
                    continue;
                }
            };

            match session.guess(suspect, weapon) {
                Ok(GuessOutcome::Solved { solution, .. }) => {
                    writeln!(self.output, "Solved: {solution}.")?;
                    return Ok(Ending::Solved);
                }
                Ok(GuessOutcome::Exhausted { solution }) => {
                    writeln!(self.output, "Out of guesses. It was {solution}.")?;
                    return Ok(Ending::Exhausted);
                }
                Ok(GuessOutcome::Incorrect {
                    killer_clue,
                    weapon_clue,
                    beliefs,
                    ..
                }) => {
                    writeln!(self.output, "Wrong.")?;
                    if let Some(clue) = killer_clue {
                        writeln!(self.output, "    {clue}")?;
                    }
                    writeln!(self.output, "    {weapon_clue}")?;
                    self.print_beliefs(&beliefs)?;
                }
                Err(err) => {
                    if let Some(ending) = self.report(&err)? {
                        return Ok(ending);
                    }
                }
            }
        }
    }
}
