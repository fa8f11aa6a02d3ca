//! Textual fixes applied to a drafted reply before it is sent.

use std::sync::LazyLock;

use regex::Regex;

use super::persona::CustomEmoji;

static CUSTOM_EMOJI_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a?:(\w+):\d+>").expect("emoji markup regex is valid"));

static DOG_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:i['’]?m|i am)\s+a\s+d[o0]g\w*\b([.!?])?")
        .expect("dog claim regex is valid")
});

/// Rewrite `<:name:id>` and `<a:name:id>` to `:name:`, then expand each known
/// `:name:` into its full markup.
#[must_use]
pub fn normalize_emojis(text: &str, emojis: &[CustomEmoji]) -> String {
    let mut text = CUSTOM_EMOJI_MARKUP.replace_all(text, ":$1:").into_owned();
    for emoji in emojis {
        let placeholder = format!(":{}:", emoji.name);
        text = text.replace(&placeholder, emoji.complete);
    }
    text
}

/// Snow is a cat. Any "I'm a dog" claim becomes "I'm not a dog", keeping its terminator.
#[must_use]
pub fn correct_persona(text: &str) -> String {
    DOG_CLAIM.replace_all(text, "I'm not a dog${1}").into_owned()
}

/// Apply every reply fix in order.
#[must_use]
pub fn polish_reply(draft: &str, emojis: &[CustomEmoji]) -> String {
    correct_persona(&normalize_emojis(draft, emojis))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLEP: CustomEmoji = CustomEmoji {
        name: "blep",
        complete: "<:blep:1122334455>",
        description: "tongue out",
    };

    #[test]
    fn static_emoji_markup_is_stripped_to_name() {
        assert_eq!(
            normalize_emojis("hi <:partyparrot:123456789012345678>!", &[]),
            "hi :partyparrot:!"
        );
    }

    #[test]
    fn animated_emoji_markup_is_stripped_to_name() {
        assert_eq!(
            normalize_emojis("<a:wave:987654321098765432>", &[]),
            ":wave:"
        );
    }

    #[test]
    fn known_emojis_are_expanded() {
        assert_eq!(
            normalize_emojis(":blep: and <:blep:1> and :other:", &[BLEP]),
            "<:blep:1122334455> and <:blep:1122334455> and :other:"
        );
    }

    #[test]
    fn dog_claim_keeps_terminator() {
        assert_eq!(correct_persona("I'm a dog."), "I'm not a dog.");
        assert_eq!(correct_persona("I’m a DOG!"), "I'm not a dog!");
    }

    #[test]
    fn dog_claim_tolerates_zero_and_suffix() {
        assert_eq!(correct_persona("i am a d0gg0"), "I'm not a dog");
        assert_eq!(
            correct_persona("mrrp, im a doggo now"),
            "mrrp, I'm not a dog now"
        );
    }

    #[test]
    fn unrelated_text_is_untouched() {
        let text = "I am a cat and I like dogs.";
        assert_eq!(correct_persona(text), text);
    }

    #[test]
    fn polish_applies_both_fixes() {
        assert_eq!(
            polish_reply("<:blep:1> I am a dog?", &[BLEP]),
            "<:blep:1122334455> I'm not a dog?"
        );
    }
}
