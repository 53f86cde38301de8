//! Acquiring the host to scan.
//!
//! Order: command-line argument, then the first line of piped stdin, then
//! an interactive prompt.

use std::io::{self, BufRead, IsTerminal, Write};

const PROMPT: &str = "Enter a host to scan: ";

/// Return the host to scan, reading stdin if none was given.
///
/// Blocks on stdin; call from a blocking context.
pub fn acquire_host(explicit: Option<String>) -> io::Result<String> {
    if let Some(host) = explicit {
        return Ok(host.trim().to_string());
    }
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    read_host(interactive, stdin.lock(), io::stderr())
}

/// Read one host line, prompting first when `interactive`.
///
/// Piped input skips blank lines. An empty result is passed through; the
/// resolver rejects it.
pub fn read_host<R: BufRead, W: Write>(
    interactive: bool,
    mut input: R,
    mut prompt: W,
) -> io::Result<String> {
    if interactive {
        write!(prompt, "{}", PROMPT)?;
        prompt.flush()?;
    }
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 || interactive || !line.trim().is_empty() {
            return Ok(line.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_host_wins() {
        let host = acquire_host(Some("  example.com \n".to_string())).unwrap();
        assert_eq!(host, "example.com");
    }

    #[test]
    fn test_piped_input_reads_first_line() {
        let mut prompt = Vec::new();
        let host = read_host(false, "10.0.0.1\nignored\n".as_bytes(), &mut prompt).unwrap();
        assert_eq!(host, "10.0.0.1");
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_piped_input_skips_blank_lines() {
        let host = read_host(false, "\n  \n192.0.2.7\n".as_bytes(), Vec::new()).unwrap();
        assert_eq!(host, "192.0.2.7");
    }

    #[test]
    fn test_interactive_prompts() {
        let mut prompt = Vec::new();
        let host = read_host(true, "scanme.example\n".as_bytes(), &mut prompt).unwrap();
        assert_eq!(host, "scanme.example");
        assert_eq!(String::from_utf8(prompt).unwrap(), PROMPT);
    }

    #[test]
    fn test_empty_input() {
        let host = read_host(false, "".as_bytes(), Vec::new()).unwrap();
        assert!(host.is_empty());
    }
}
