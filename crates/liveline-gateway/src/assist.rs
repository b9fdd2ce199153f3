//! Assist responder — keyword-driven service answers
//!
//! Peripheral plumbing around the desk: canned guidance for the common
//! government-service questions, plus detection of "I want a human" phrasing
//! so the client can offer the live-agent button.

/// Answer a free-text question. Returns the reply and whether the message
/// looked like a request for a live agent.
pub fn respond(message: &str, language: &str) -> (String, bool) {
    let lower = message.to_lowercase();

    let live_agent_keywords: &[&str] = if language == "sw" {
        &[
            "msaidizi",
            "mtu halisi",
            "zungumza na mtu",
            "msaidizi wa moja kwa moja",
        ]
    } else {
        &[
            "live agent",
            "human agent",
            "speak to person",
            "talk to human",
            "real person",
        ]
    };
    let suggest_live_agent = live_agent_keywords.iter().any(|k| lower.contains(k));

    if lower.contains("passport") || lower.contains("pasipoti") {
        let response = if language == "sw" {
            "Kuomba pasipoti, unahitaji: 1) Kitambulisho cha Kitaifa, 2) Cheti cha Kuzaliwa, 3) Picha 2 za pasipoti. Tembelea huduma.go.ke au ofisi ya eCitizen karibu nawe."
        } else {
            "To apply for a passport, you need: 1) National ID, 2) Birth Certificate, 3) 2 passport photos. Visit huduma.go.ke or your nearest eCitizen office."
        };
        return (response.to_string(), false);
    }

    if lower.contains("kra") || lower.contains("pin") || lower.contains("tax") {
        let response = if language == "sw" {
            "Kusajili PIN ya KRA: 1) Tembelea itax.kra.go.ke, 2) Chagua 'Register PIN', 3) Jaza fomu na wasilisha. Utapokea PIN ndani ya siku 7."
        } else {
            "To register for KRA PIN: 1) Visit itax.kra.go.ke, 2) Select 'Register PIN', 3) Fill the form and submit. You'll receive your PIN within 7 days."
        };
        return (response.to_string(), false);
    }

    if lower.contains("nhif") {
        let response = if language == "sw" {
            "Kusajili NHIF: 1) Tembelea ofisi ya NHIF na Kitambulisho, 2) Jaza fomu ya usajili, 3) Lipa ada ya usajili. Unaweza pia kusajili mtandaoni kupitia selfcare.nhif.or.ke"
        } else {
            "To register for NHIF: 1) Visit NHIF office with your ID, 2) Fill registration form, 3) Pay registration fee. You can also register online at selfcare.nhif.or.ke"
        };
        return (response.to_string(), false);
    }

    if lower.contains("kitambulisho") || lower.split_whitespace().any(|w| w == "id") {
        let response = if language == "sw" {
            "Kuomba Kitambulisho cha Kitaifa: 1) Umri lazima uwe miaka 18+, 2) Pata fomu kutoka ofisi ya chief, 3) Wasilisha na cheti cha kuzaliwa na picha. Tembelea huduma.go.ke kwa maelezo zaidi."
        } else {
            "To apply for National ID: 1) Must be 18+ years, 2) Get form from chief's office, 3) Submit with birth certificate and photo. Visit huduma.go.ke for more details."
        };
        return (response.to_string(), false);
    }

    let response = if language == "sw" {
        format!(
            "Ninaelewa unauliza kuhusu \"{message}\". Je, ungependa maelezo zaidi kuhusu huduma hii? Ninaweza kukusaidia na Pasipoti, KRA PIN, NHIF, Kitambulisho, na huduma nyingine za serikali."
        )
    } else {
        format!(
            "I understand you're asking about \"{message}\". Would you like more details about this service? I can help with Passports, KRA PIN, NHIF, National ID, and other government services."
        )
    };
    (response, suggest_live_agent)
}
