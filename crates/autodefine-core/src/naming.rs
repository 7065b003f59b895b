/// Convert an identifier to lower camel case.
///
/// Words are split on any non-alphanumeric character, on lower-to-upper
/// case boundaries and before the last capital of an acronym run, so
/// `created_at`, `Created-At` and `createdAt` all become `createdAt` and
/// `XMLHttpRequest` becomes `xmlHttpRequest`.
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (idx, word) in split_words(input).iter().enumerate() {
        let lower = word.to_lowercase();
        if idx == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (idx, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let prev = idx.checked_sub(1).map(|at| chars[at]).filter(|p| p.is_alphanumeric());
        let next = chars.get(idx + 1).copied();
        let boundary = prev.is_some_and(|p| {
            (p.is_lowercase() && ch.is_uppercase())
                || (p.is_ascii_digit() && ch.is_alphabetic())
                || (p.is_alphabetic() && ch.is_ascii_digit())
                // last capital of an acronym run starts the next word: XMLHttp
                || (p.is_uppercase() && ch.is_uppercase() && next.is_some_and(char::is_lowercase))
        });
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
