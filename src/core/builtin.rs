//! # Built-in SafeVoice Menu
//!
//! The USSD tree a caller reaches by dialling the SafeVoice code from a basic
//! phone. Six topic menus hang off the main screen; every entry in a topic
//! menu is an action with a canned response.

use crate::core::menu::{ActionDef, MenuDefinition, ScreenDef};
use crate::core::screen::{ActionId, Destination, ScreenId};

const RULE: &str = "==================";

fn screen(
    id: &str,
    title: &str,
    entries: &[(&str, &str, Destination)],
    action_required: bool,
) -> ScreenDef {
    let mut lines = vec![RULE.to_string()];
    lines.extend(entries.iter().map(|(key, label, _)| format!("{key}. {label}")));
    lines.push(RULE.to_string());
    ScreenDef {
        id: ScreenId::new(id),
        title: title.to_string(),
        lines,
        action_required,
        options: entries
            .iter()
            .map(|(key, _, dest)| (key.to_string(), dest.clone()))
            .collect(),
    }
}

fn go(id: &str) -> Destination {
    Destination::Screen(ScreenId::new(id))
}

fn act(id: &str) -> Destination {
    Destination::Action(ActionId::new(id))
}

fn action(id: &str, title: &str, lines: &[&str], narration: Option<&str>) -> ActionDef {
    ActionDef {
        id: ActionId::new(id),
        title: title.to_string(),
        lines: lines.iter().map(|l| l.to_string()).collect(),
        narration: narration.map(str::to_string),
    }
}

pub fn builtin_menu() -> MenuDefinition {
    MenuDefinition {
        root: ScreenId::new("main"),
        emergency: Some(ScreenId::new("emergency")),
        call_action: Some(ActionId::new("call911")),
        screens: screens(),
        actions: [
            emergency_actions(),
            report_actions(),
            resource_actions(),
            legal_actions(),
            contact_actions(),
            location_actions(),
        ]
        .concat(),
    }
}

fn screens() -> Vec<ScreenDef> {
    vec![
        screen(
            "main",
            "SafeVoice USSD",
            &[
                ("1", "Emergency SOS 🚨", go("emergency")),
                ("2", "Report Incident 📝", go("report")),
                ("3", "Safety Resources 📚", go("resources")),
                ("4", "Legal Assistance ⚖️", go("legal")),
                ("5", "Trusted Contacts 👥", go("contacts")),
                ("6", "Get Help Location 📍", go("location")),
                ("0", "Exit System 🚪", Destination::Exit),
            ],
            false,
        ),
        screen(
            "emergency",
            "🚨 EMERGENCY SOS 🚨",
            &[
                ("1", "Call 911 Now 📞", act("call911")),
                ("2", "Silent Alarm 🔕", act("silentAlarm")),
                ("3", "Alert Contacts 📱", act("alertContacts")),
                ("4", "Share Location 📍", act("shareLocation")),
                ("5", "Police Assistance 👮", act("police")),
                ("6", "Medical Emergency 🚑", act("medical")),
            ],
            true,
        ),
        screen(
            "report",
            "📝 REPORT INCIDENT",
            &[
                ("1", "Harassment 😠", act("reportHarassment")),
                ("2", "Physical Assault 👊", act("reportAssault")),
                ("3", "Sexual Assault ⚠️", act("reportSexualAssault")),
                ("4", "Stalking 👁️", act("reportStalking")),
                ("5", "Cyber Crime 💻", act("reportCyber")),
                ("6", "Other Incident 📋", act("reportOther")),
            ],
            false,
        ),
        screen(
            "resources",
            "📚 SAFETY RESOURCES",
            &[
                ("1", "Crisis Hotlines 📞", act("hotlines")),
                ("2", "Shelters & Housing 🏠", act("shelters")),
                ("3", "Counseling Services 💭", act("counseling")),
                ("4", "Safety Tips 💡", act("safetyTips")),
                ("5", "Support Groups 👫", act("supportGroups")),
                ("6", "Educational Material 📖", act("education")),
            ],
            false,
        ),
        screen(
            "legal",
            "⚖️ LEGAL ASSISTANCE",
            &[
                ("1", "Legal Aid Services 📋", act("legalAid")),
                ("2", "Restraining Orders 🚫", act("restrainingOrder")),
                ("3", "Court Support 🏛️", act("courtSupport")),
                ("4", "Rights Information ℹ️", act("rightsInfo")),
                ("5", "Lawyer Referrals 👨‍⚖️", act("lawyerReferral")),
                ("6", "Legal Documents 📄", act("legalDocs")),
            ],
            false,
        ),
        screen(
            "contacts",
            "👥 TRUSTED CONTACTS",
            &[
                ("1", "Add New Contact ➕", act("addContact")),
                ("2", "View Contacts 👀", act("viewContacts")),
                ("3", "Emergency Contacts 🚨", act("emergencyContacts")),
                ("4", "Family Members 👨‍👩‍👧‍👦", act("familyContacts")),
                ("5", "Professional Help 👩‍⚕️", act("professionalContacts")),
                ("6", "Quick Alert All 📢", act("alertAll")),
            ],
            false,
        ),
        screen(
            "location",
            "📍 GET HELP LOCATION",
            &[
                ("1", "Nearest Police 👮", act("nearestPolice")),
                ("2", "Nearest Hospital 🏥", act("nearestHospital")),
                ("3", "Safe Locations 🏠", act("safeLocations")),
                ("4", "Support Centers 🏢", act("supportCenters")),
                ("5", "Share My Location 📤", act("shareMyLocation")),
                ("6", "Navigation Help 🧭", act("navigation")),
            ],
            false,
        ),
    ]
}

fn emergency_actions() -> Vec<ActionDef> {
    vec![
        action(
            "call911",
            "🚨 CALLING 911... 🚨",
            &[
                RULE,
                "📞 Connecting...",
                "🌍 Location: Shared",
                "⏰ Time: {time}",
                "",
                "Emergency services",
                "have been dispatched",
                RULE,
                "✅ HELP IS COMING",
            ],
            Some("Emergency mode activated. Calling emergency services."),
        ),
        action(
            "silentAlarm",
            "🔕 SILENT ALARM SENT",
            &[
                RULE,
                "📤 Alert sent to:",
                "• Local Police 👮",
                "• Emergency Contacts 📱",
                "• SafeVoice Network 🌐",
                "• GPS Location Shared 📍",
                RULE,
                "✅ Stay calm. Help",
                "is on the way.",
            ],
            None,
        ),
        action(
            "alertContacts",
            "📱 CONTACTS ALERTED",
            &[
                RULE,
                "📤 SMS sent to 3 contacts",
                "📍 Location attached",
                "⏰ Time: {time}",
                RULE,
                "✅ Your contacts have",
                "been notified.",
            ],
            Some("Your trusted contacts have been alerted."),
        ),
        action(
            "shareLocation",
            "📍 LOCATION SHARED",
            &[
                RULE,
                "📍 {position}",
                "📤 Sent to emergency contacts",
                "⏰ Time: {time}",
                RULE,
                "✅ Location shared",
            ],
            Some("Your location has been shared."),
        ),
        action(
            "police",
            "👮 POLICE ASSISTANCE",
            &[
                RULE,
                "📞 Requesting police...",
                "👮 {nearest:police}",
                "📞 {phone:police}",
                "🆔 Ref: {case_id}",
                RULE,
                "✅ Officers notified",
            ],
            Some("Police assistance has been requested."),
        ),
        action(
            "medical",
            "🚑 MEDICAL EMERGENCY",
            &[
                RULE,
                "📞 Calling ambulance...",
                "🏥 {nearest:hospital}",
                "📞 EMS: 10177",
                "⏰ Time: {time}",
                RULE,
                "✅ Ambulance dispatched",
            ],
            Some("An ambulance has been requested."),
        ),
    ]
}

fn report(id: &str, kind: &str) -> ActionDef {
    let title = format!("📝 REPORTING: {kind}");
    action(
        id,
        &title,
        &[
            RULE,
            "📤 Submitting report...",
            "🆔 Case ID: {case_id}",
            "📍 Location: Recorded",
            "⏰ Time: {datetime}",
            RULE,
            "✅ Report submitted",
            "📧 Confirmation sent",
            "🔒 Information secured",
        ],
        None,
    )
}

fn report_actions() -> Vec<ActionDef> {
    vec![
        report("reportHarassment", "Harassment"),
        report("reportAssault", "Physical Assault"),
        report("reportSexualAssault", "Sexual Assault"),
        report("reportStalking", "Stalking"),
        report("reportCyber", "Cyber Crime"),
        report("reportOther", "Other Incident"),
    ]
}

fn resource_actions() -> Vec<ActionDef> {
    vec![
        action(
            "hotlines",
            "📞 CRISIS HOTLINES",
            &[
                RULE,
                "🆘 National: 116 123",
                "👩 Women's Line: 0800 150 150",
                "👶 Child Line: 116",
                "💊 Substance: 0861 435 787",
                "🏳️‍🌈 LGBTQ+: 021 422 0255",
                RULE,
                "All lines available 24/7",
            ],
            None,
        ),
        action(
            "shelters",
            "🏠 SHELTERS & HOUSING",
            &[
                RULE,
                "🏠 {nearest:safe_house}",
                "📞 {phone:safe_house}",
                "🏠 Johannesburg Shelter",
                "📞 011 123 4567",
                "🏠 Emergency Housing",
                "📞 011 555 0199",
                RULE,
                "Safe spaces available",
            ],
            None,
        ),
        action(
            "counseling",
            "💭 COUNSELING SERVICES",
            &[
                RULE,
                "💭 {nearest:counseling}",
                "📞 {phone:counseling}",
                "📞 Lifeline: 0861 322 322",
                "📞 SADAG: 011 234 4837",
                RULE,
                "Free & confidential",
            ],
            None,
        ),
        action(
            "safetyTips",
            "💡 SAFETY TIPS",
            &[
                RULE,
                "• Keep your phone charged",
                "• Share plans with a friend",
                "• Memorise *384*SOS#",
                "• Trust your instincts",
                "• Know your nearest exit",
                RULE,
            ],
            None,
        ),
        action(
            "supportGroups",
            "👫 SUPPORT GROUPS",
            &[
                RULE,
                "👫 Survivor Circle",
                "   Tue 18:00, Observatory",
                "👫 Healing Together",
                "   Sat 10:00, Woodstock",
                RULE,
                "📤 Details sent by SMS",
            ],
            None,
        ),
        action(
            "education",
            "📖 EDUCATIONAL MATERIAL",
            &[
                RULE,
                "📖 Safety Planning Guide",
                "📖 Legal Rights Handbook",
                "📖 Digital Safety & Privacy",
                "📖 Healing After Trauma",
                RULE,
                "📤 Links sent by SMS",
            ],
            None,
        ),
    ]
}

fn legal_actions() -> Vec<ActionDef> {
    vec![
        action(
            "legalAid",
            "📋 LEGAL AID SERVICES",
            &[
                RULE,
                "⚖️ {nearest:legal_aid}",
                "📞 {phone:legal_aid}",
                "📞 Advice line: 0800 110 110",
                RULE,
                "Free for qualifying callers",
            ],
            None,
        ),
        action(
            "restrainingOrder",
            "🚫 RESTRAINING ORDERS",
            &[
                RULE,
                "1) Visit any magistrate court",
                "2) Complete Form 2 (DVA)",
                "3) Interim order same day",
                "🆔 Ref: {case_id}",
                RULE,
                "📤 Steps sent by SMS",
            ],
            None,
        ),
        action(
            "courtSupport",
            "🏛️ COURT SUPPORT",
            &[
                RULE,
                "🤝 A court supporter will",
                "   call you back",
                "🆔 Ref: {case_id}",
                "⏰ Requested: {datetime}",
                RULE,
                "✅ Request logged",
            ],
            None,
        ),
        action(
            "rightsInfo",
            "ℹ️ YOUR RIGHTS",
            &[
                RULE,
                "• Police must take your report",
                "• You may request a female",
                "  officer",
                "• Protection orders are free",
                "• You may bring a supporter",
                RULE,
            ],
            None,
        ),
        action(
            "lawyerReferral",
            "👨‍⚖️ LAWYER REFERRALS",
            &[
                RULE,
                "📤 Referral requested",
                "🆔 Ref: {case_id}",
                "📞 A pro-bono lawyer will",
                "   contact you within 48h",
                RULE,
                "✅ Request logged",
            ],
            None,
        ),
        action(
            "legalDocs",
            "📄 LEGAL DOCUMENTS",
            &[
                RULE,
                "📄 Protection order form",
                "📄 Affidavit template",
                "📄 Evidence checklist",
                RULE,
                "📤 Links sent by SMS",
            ],
            None,
        ),
    ]
}

fn contact_actions() -> Vec<ActionDef> {
    vec![
        action(
            "addContact",
            "➕ ADD CONTACT",
            &[
                RULE,
                "📤 Reply by SMS with:",
                "   NAME NUMBER",
                "   to 38477",
                RULE,
                "Contact saved on reply",
            ],
            None,
        ),
        action(
            "viewContacts",
            "👀 YOUR CONTACTS",
            &[
                RULE,
                "1. Thandi  082 555 0101",
                "2. Sipho   083 555 0202",
                "3. Dr Naidoo 021 555 0303",
                RULE,
            ],
            None,
        ),
        action(
            "emergencyContacts",
            "🚨 EMERGENCY CONTACTS",
            &[
                RULE,
                "👮 Police: 10111",
                "🚑 Ambulance: 10177",
                "🆘 GBV Centre: 0800 428 428",
                RULE,
                "All lines available 24/7",
            ],
            None,
        ),
        action(
            "familyContacts",
            "👨‍👩‍👧‍👦 FAMILY MEMBERS",
            &[RULE, "1. Thandi  082 555 0101", "2. Sipho   083 555 0202", RULE],
            None,
        ),
        action(
            "professionalContacts",
            "👩‍⚕️ PROFESSIONAL HELP",
            &[
                RULE,
                "💭 {nearest:counseling}",
                "📞 {phone:counseling}",
                "⚖️ {nearest:legal_aid}",
                "📞 {phone:legal_aid}",
                RULE,
            ],
            None,
        ),
        action(
            "alertAll",
            "📢 ALERT SENT TO ALL",
            &[
                RULE,
                "📤 Alert sent to 3 contacts",
                "📍 Location attached",
                "⏰ Time: {time}",
                RULE,
                "✅ Everyone has been",
                "notified.",
            ],
            Some("All your contacts have been alerted."),
        ),
    ]
}

fn location_actions() -> Vec<ActionDef> {
    vec![
        action(
            "nearestPolice",
            "👮 NEAREST POLICE",
            &[RULE, "👮 {nearest:police}", "📞 {phone:police}", RULE, "Open 24/7"],
            None,
        ),
        action(
            "nearestHospital",
            "🏥 NEAREST HOSPITAL",
            &[
                RULE,
                "🏥 {nearest:hospital}",
                "📞 {phone:hospital}",
                RULE,
                "24/7 emergency room",
            ],
            None,
        ),
        action(
            "safeLocations",
            "🏠 SAFE LOCATIONS",
            &[
                RULE,
                "🏠 {nearest:safe_house}",
                "📞 {phone:safe_house}",
                "🏥 {nearest:hospital}",
                "👮 {nearest:police}",
                RULE,
            ],
            None,
        ),
        action(
            "supportCenters",
            "🏢 SUPPORT CENTERS",
            &[
                RULE,
                "💭 {nearest:counseling}",
                "📞 {phone:counseling}",
                "⚖️ {nearest:legal_aid}",
                "📞 {phone:legal_aid}",
                RULE,
            ],
            None,
        ),
        action(
            "shareMyLocation",
            "📤 LOCATION SHARED",
            &[
                RULE,
                "📍 {position}",
                "📤 Sent to trusted contacts",
                "⏰ Time: {time}",
                RULE,
                "✅ Location shared",
            ],
            Some("Your location has been shared."),
        ),
        action(
            "navigation",
            "🧭 NAVIGATION HELP",
            &[
                RULE,
                "You are at:",
                "📍 {position}",
                "Nearest safe place:",
                "🏠 {nearest:safe_house}",
                RULE,
                "📤 Directions sent by SMS",
            ],
            None,
        ),
    ]
}
