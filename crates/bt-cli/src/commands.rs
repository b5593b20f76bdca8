use std::io::{BufRead, Write};

use bt_ledger::{Chain, LedgerReader, LedgerWriter, VerificationStatus};
use bt_store::LedgerStore;
use bt_types::TxId;
use colored::Colorize;

use crate::cli::{PrintTarget, ShellCommand};

pub const PROMPT: &str = "BT> ";

const HELP: &str = "\
commands:
  commit <data>                     commit the rest of the line, print its id
  retrieve <id>                     show committed data and its status
  verify <id> <data>                check data against a committed id
  print chain|latest|buffer|tree    dump chain state
  audit                             check every block link back to the seed
  help                              show this list
  exit                              leave (EOF works too)";

/// Whether the shell keeps reading after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Read commands from `input` until `exit` or EOF.
///
/// A failing command prints its error and the loop carries on; only I/O
/// errors on `input` or `out` end the shell early.
pub fn repl<S: LedgerStore>(
    chain: &Chain<S>,
    input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} batch size {}, seed {}",
        "BlockTrain".bold(),
        chain.batch_size(),
        chain.seed_hash()
    )?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match run_command(chain, ShellCommand::parse(&line), &mut out) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(out, "{} {e:#}", "error:".red().bold())?,
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

pub fn run_command<S: LedgerStore>(
    chain: &Chain<S>,
    command: ShellCommand,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    match command {
        ShellCommand::Commit(data) => cmd_commit(chain, &data, out)?,
        ShellCommand::Retrieve(id) => cmd_retrieve(chain, &TxId::from(id), out)?,
        ShellCommand::Verify { id, data } => cmd_verify(chain, &TxId::from(id), &data, out)?,
        ShellCommand::Print(target) => cmd_print(chain, target, out)?,
        ShellCommand::Audit => cmd_audit(chain, out)?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Empty => {}
        ShellCommand::Usage(hint) => writeln!(out, "{}", hint.yellow())?,
        ShellCommand::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn cmd_commit(ledger: &impl LedgerWriter, data: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let id = ledger.commit(data.as_bytes())?;
    writeln!(out, "TX-ID: {}", id.as_str().yellow())?;
    Ok(())
}

fn cmd_retrieve(ledger: &impl LedgerReader, id: &TxId, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(data) = ledger.retrieve(id)? else {
        writeln!(out, "{}", paint(VerificationStatus::UnknownTxId))?;
        return Ok(());
    };
    let status = ledger.verify(id, &data)?;
    writeln!(out, "Data: {}", String::from_utf8_lossy(&data))?;
    writeln!(out, "Status: {}", paint(status))?;
    Ok(())
}

fn cmd_verify(
    ledger: &impl LedgerReader,
    id: &TxId,
    data: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let status = ledger.verify(id, data.as_bytes())?;
    writeln!(out, "{}", paint(status))?;
    Ok(())
}

fn cmd_print<S: LedgerStore>(
    chain: &Chain<S>,
    target: PrintTarget,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match target {
        PrintTarget::Chain => write!(out, "{}", chain.chain_log()?)?,
        PrintTarget::Latest => match chain.latest_block()? {
            Some(block) => writeln!(out, "{block}")?,
            None => writeln!(out, "No blocks yet")?,
        },
        PrintTarget::Buffer => {
            let pending = chain.pending()?;
            writeln!(out, "TX-Buffer: {}/{}", pending.len(), chain.batch_size())?;
            for (index, id) in pending.iter().enumerate() {
                writeln!(out, "{index}: {id}")?;
            }
        }
        PrintTarget::Tree => match chain.latest_tree()? {
            Some(tree) => write!(out, "{}", tree.render())?,
            None => writeln!(out, "No blocks yet")?,
        },
    }
    Ok(())
}

fn cmd_audit<S: LedgerStore>(chain: &Chain<S>, out: &mut impl Write) -> anyhow::Result<()> {
    match chain.audit() {
        Ok(count) => writeln!(
            out,
            "{} {count} block(s) link back to the seed",
            "✓".green().bold()
        )?,
        Err(e) => writeln!(out, "{} audit failed: {e}", "✗".red().bold())?,
    }
    Ok(())
}

fn paint(status: VerificationStatus) -> colored::ColoredString {
    if status.is_match() {
        status.as_str().green()
    } else if status == VerificationStatus::UnknownTxId {
        status.as_str().yellow()
    } else {
        status.as_str().red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt_ledger::ChainConfig;
    use bt_store::InMemoryStore;

    fn chain(batch_size: usize) -> Chain<InMemoryStore> {
        Chain::genesis(
            InMemoryStore::new(),
            ChainConfig { batch_size, log_events: false },
        )
        .unwrap()
    }

    fn run(chain: &Chain<InMemoryStore>, line: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        run_command(chain, ShellCommand::parse(line), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn committed_id(output: &str) -> String {
        output.trim().trim_start_matches("TX-ID: ").to_string()
    }

    #[test]
    fn commit_then_verify() {
        let chain = chain(4);
        let id = committed_id(&run(&chain, "commit hello world"));

        assert_eq!(
            run(&chain, &format!("verify {id} hello world")),
            "In buffer (not yet in a block)\n"
        );
        assert_eq!(
            run(&chain, &format!("verify {id} hello")),
            "In buffer (not yet in a block) / Invalid (data-txID mismatch)\n"
        );
        assert_eq!(run(&chain, "verify nope x"), "Unknown transaction ID\n");
    }

    #[test]
    fn retrieve_shows_data_and_status() {
        let chain = chain(2);
        let id = committed_id(&run(&chain, "commit a"));
        run(&chain, "commit b");

        assert_eq!(
            run(&chain, &format!("retrieve {id}")),
            "Data: a\nStatus: Verified\n"
        );
        assert_eq!(run(&chain, "retrieve missing"), "Unknown transaction ID\n");
    }

    #[test]
    fn print_before_and_after_seal() {
        let chain = chain(2);
        assert_eq!(run(&chain, "print latest"), "No blocks yet\n");
        assert_eq!(run(&chain, "print tree"), "No blocks yet\n");

        let id = committed_id(&run(&chain, "commit a"));
        assert_eq!(run(&chain, "print buffer"), format!("TX-Buffer: 1/2\n0: {id}\n"));

        run(&chain, "commit b");
        assert_eq!(run(&chain, "print buffer"), "TX-Buffer: 0/2\n");

        let latest = chain.latest_block().unwrap().unwrap();
        assert!(run(&chain, "print latest").starts_with(&format!("### {}", latest.hash())));
        assert_eq!(run(&chain, "print tree").lines().count(), 3);
        assert!(run(&chain, "print chain").contains("1 Blocks in chain"));
    }

    #[test]
    fn audit_reports_block_count() {
        let chain = chain(2);
        for line in ["commit a", "commit b", "commit c", "commit d"] {
            run(&chain, line);
        }
        assert_eq!(run(&chain, "audit"), "✓ 2 block(s) link back to the seed\n");
    }

    #[test]
    fn malformed_lines_print_hints() {
        let chain = chain(2);
        assert_eq!(run(&chain, "verify onlyid"), "usage: verify <id> <data>\n");
        assert_eq!(run(&chain, "dance"), "unknown command; type `help` for a list\n");
        assert!(run(&chain, "help").contains("print chain|latest|buffer|tree"));
        assert_eq!(run(&chain, ""), "");
    }

    #[test]
    fn repl_runs_until_exit() {
        colored::control::set_override(false);
        let chain = chain(2);
        let input = b"commit a\ncommit b\nprint buffer\nexit\ncommit never\n";
        let mut out = Vec::new();
        repl(&chain, &input[..], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("TX-Buffer: 0/2"));
        assert_eq!(text.matches("TX-ID: ").count(), 2);
        assert!(chain.latest_block().unwrap().is_some());
    }

    #[test]
    fn repl_stops_at_eof() {
        colored::control::set_override(false);
        let chain = chain(3);
        let mut out = Vec::new();
        repl(&chain, &b"commit x\n"[..], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(&format!("{PROMPT}\n")));
        assert_eq!(chain.pending().unwrap().len(), 1);
    }
}
