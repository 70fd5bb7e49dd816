// File: src/seed.rs
use crate::core::types::Language::{self, English, French, Portuguese, Spanish};

/// Starter vocabulary: (source, target, phrase, translation).
pub const SEED_VOCABULARY: &[(Language, Language, &str, &str)] = &[
    (Spanish, English, "hola", "hello"),
    (Spanish, English, "adiós", "goodbye"),
    (Spanish, English, "gracias", "thank you"),
    (Spanish, English, "por favor", "please"),
    (Spanish, English, "agua", "water"),
    (Spanish, English, "comida", "food"),
    (Spanish, English, "casa", "house"),
    (English, Spanish, "hello", "hola"),
    (English, Spanish, "goodbye", "adiós"),
    (English, Spanish, "thank you", "gracias"),
    (English, Spanish, "please", "por favor"),
    (English, Spanish, "water", "agua"),
    (English, Spanish, "food", "comida"),
    (English, Spanish, "house", "casa"),
    (Spanish, French, "hola", "bonjour"),
    (Spanish, French, "adiós", "au revoir"),
    (Spanish, French, "gracias", "merci"),
    (Spanish, French, "agua", "eau"),
    (French, Spanish, "bonjour", "hola"),
    (French, Spanish, "au revoir", "adiós"),
    (French, Spanish, "merci", "gracias"),
    (French, Spanish, "eau", "agua"),
    (Spanish, Portuguese, "hola", "olá"),
    (Spanish, Portuguese, "adiós", "adeus"),
    (Spanish, Portuguese, "gracias", "obrigado"),
    (Spanish, Portuguese, "agua", "água"),
    (Portuguese, Spanish, "olá", "hola"),
    (Portuguese, Spanish, "adeus", "adiós"),
    (Portuguese, Spanish, "obrigado", "gracias"),
    (Portuguese, Spanish, "água", "agua"),
    (English, French, "hello", "bonjour"),
    (English, French, "goodbye", "au revoir"),
    (English, French, "water", "eau"),
    (English, Portuguese, "hello", "olá"),
    (English, Portuguese, "goodbye", "adeus"),
    (English, Portuguese, "water", "água"),
];
