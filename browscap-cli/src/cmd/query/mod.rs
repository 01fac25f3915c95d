//! browscap query command

use browscap::{
    Browscap, CapabilityProfile,
    error::{BoxError, ErrorContext as _},
};
use clap::Args;
use serde::Serialize;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

#[derive(Debug, Args)]
/// look up the browser capabilities of user agents
pub struct CliCommandQuery {
    #[arg(long, short = 'i')]
    /// path to the browscap.ini catalog
    ini: PathBuf,

    #[arg(long)]
    /// print one json object per user agent
    json: bool,

    /// user agents to look up
    ///
    /// (read one per line from stdin if none are given)
    user_agents: Vec<String>,
}

/// run the browscap query command
pub fn run(cfg: CliCommandQuery) -> Result<(), BoxError> {
    let catalog = browscap::ini::load_path(&cfg.ini)?;
    let browscap = Browscap::build(&catalog)?;
    tracing::debug!(entries = browscap.index().len(), "browscap ready");

    let mut out = io::stdout().lock();
    if cfg.user_agents.is_empty() {
        write_results_from_lines(&mut out, &browscap, io::stdin().lock(), cfg.json)?;
    } else {
        for user_agent in &cfg.user_agents {
            write_result(&mut out, &browscap, user_agent, cfg.json)?;
        }
    }

    out.flush().context("flush stdout")?;
    Ok(())
}

/// Look up one user agent per line, skipping empty lines.
///
/// Lines are taken as-is apart from their line ending.
fn write_results_from_lines(
    out: &mut impl Write,
    browscap: &Browscap,
    input: impl BufRead,
    json: bool,
) -> Result<(), BoxError> {
    for line in input.lines() {
        let line = line.context("read user agent from stdin")?;
        let user_agent = line.trim_end_matches('\r');
        if user_agent.is_empty() {
            continue;
        }
        write_result(out, browscap, user_agent, json)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct QueryOutput<'a> {
    user_agent: &'a str,
    entry: Option<&'a str>,
    profile: Option<&'a CapabilityProfile>,
}

fn write_result(
    out: &mut impl Write,
    browscap: &Browscap,
    user_agent: &str,
    json: bool,
) -> Result<(), BoxError> {
    let result = browscap.query_entry(user_agent);

    if json {
        let output = QueryOutput {
            user_agent,
            entry: result.as_ref().map(|(entry, _)| &**entry),
            profile: result.as_ref().map(|(_, profile)| *profile),
        };
        serde_json::to_writer(&mut *out, &output).context("encode query result")?;
        writeln!(out).context("write query result")?;
        return Ok(());
    }

    match result {
        Some((entry, profile)) => writeln!(
            out,
            "{user_agent} => {entry}: {} {} on {}",
            profile.browser, profile.version, profile.platform
        ),
        None => writeln!(out, "{user_agent} => not found"),
    }
    .context("write query result")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browscap() -> Browscap {
        let catalog = browscap::ini::parse_str(
            "[Default Browser]\nJavaScript=true\n\n\
             [Mozilla/5.0*Firefox/*]\nParent=Default Browser\nBrowser=Firefox\nVersion=99.0\nPlatform=Linux\n",
        )
        .unwrap();
        Browscap::build(&catalog).unwrap()
    }

    fn output(user_agent: &str, json: bool) -> String {
        let mut out = Vec::new();
        write_result(&mut out, &browscap(), user_agent, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn human_output() {
        assert_eq!(
            output("Mozilla/5.0 Firefox/99.0", false),
            "Mozilla/5.0 Firefox/99.0 => Mozilla/5.0*Firefox/*: Firefox 99.0 on Linux\n"
        );
        assert_eq!(output("curl/8.0", false), "curl/8.0 => not found\n");
    }

    #[test]
    fn lines_keep_surrounding_whitespace() {
        let input = io::Cursor::new(" Mozilla/5.0 Firefox/99.0 \n\ncurl/8.0\r\n");
        let mut out = Vec::new();
        write_results_from_lines(&mut out, &browscap(), input, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " Mozilla/5.0 Firefox/99.0  => not found\ncurl/8.0 => not found\n"
        );

        let input = io::Cursor::new("Mozilla/5.0 Firefox/99.0 \n");
        let mut out = Vec::new();
        write_results_from_lines(&mut out, &browscap(), input, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["user_agent"], "Mozilla/5.0 Firefox/99.0 ");
        assert_eq!(value["entry"], "Mozilla/5.0*Firefox/*");
    }

    #[test]
    fn json_output() {
        let value: serde_json::Value =
            serde_json::from_str(&output("Mozilla/5.0 Firefox/99.0", true)).unwrap();
        assert_eq!(value["user_agent"], "Mozilla/5.0 Firefox/99.0");
        assert_eq!(value["entry"], "Mozilla/5.0*Firefox/*");
        assert_eq!(value["profile"]["browser"], "Firefox");
        assert_eq!(value["profile"]["javascript"], true);

        let value: serde_json::Value = serde_json::from_str(&output("curl/8.0", true)).unwrap();
        assert!(value["entry"].is_null());
        assert!(value["profile"].is_null());
    }
}
