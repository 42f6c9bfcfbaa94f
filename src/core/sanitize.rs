const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Strip markdown code-fence wrapping from a model reply.
///
/// Removes a leading ```` ```json ```` fence and a trailing ```` ``` ```` fence
/// along with the whitespace next to them, then trims the result. Stripping
/// repeats until nothing changes, so applying this twice gives the same output.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    loop {
        let mut next = text;
        if let Some(rest) = next.strip_prefix(JSON_FENCE) {
            next = rest.trim_start();
        }
        if let Some(rest) = next.strip_suffix(FENCE) {
            next = rest.trim_end();
        }
        if next.len() == text.len() {
            return text;
        }
        text = next;
    }
}
