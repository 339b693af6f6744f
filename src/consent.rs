use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use unsplash_api::oauth::{AuthorizationRequest, ConsentEvent, ConsentUi};
use unsplash_api::Error;

/// Consent UI for a terminal.
///
/// Prints the consent page URL, then reads one pasted URL per line: every line is
/// reported as a navigation. An empty line, `cancel` or end of input cancels.
pub struct TerminalConsent<R> {
    lines: Mutex<Lines<BufReader<R>>>,
}

impl TerminalConsent<Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: AsyncRead + Unpin + Send> TerminalConsent<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(reader).lines()),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ConsentUi for TerminalConsent<R> {
    async fn open(&self, request: &AuthorizationRequest) -> Result<(), Error> {
        println!("Open this URL in a browser and approve access:");
        println!();
        println!("    {}", request.url);
        println!();
        println!(
            "Then paste the URL you were redirected to (starts with {}).",
            request.callback_prefix
        );
        println!("Press enter on an empty line to cancel.");
        Ok(())
    }

    async fn next_event(&self) -> ConsentEvent {
        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) => parse_line(&line),
            Ok(None) | Err(_) => ConsentEvent::Cancelled,
        }
    }
}

fn parse_line(line: &str) -> ConsentEvent {
    let line = line.trim();
    if line.is_empty() || line.eq_ignore_ascii_case("cancel") {
        ConsentEvent::Cancelled
    } else {
        ConsentEvent::Navigated(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(""), ConsentEvent::Cancelled);
        assert_eq!(parse_line("  CANCEL \n"), ConsentEvent::Cancelled);
        assert_eq!(
            parse_line(" unsplash-app://token?code=abc "),
            ConsentEvent::Navigated("unsplash-app://token?code=abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_reads_one_event_per_line_then_cancels_at_eof() {
        let input: &[u8] = b"https://unsplash.com/login\nunsplash-app://token?code=abc\n";
        let consent = TerminalConsent::new(input);

        assert_eq!(
            consent.next_event().await,
            ConsentEvent::Navigated("https://unsplash.com/login".to_string())
        );
        assert_eq!(
            consent.next_event().await,
            ConsentEvent::Navigated("unsplash-app://token?code=abc".to_string())
        );
        assert_eq!(consent.next_event().await, ConsentEvent::Cancelled);
    }
}
