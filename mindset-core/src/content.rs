//! Built-in scenario content.
//!
//! Five detective scenarios narrated by Johnny, the player's partner.
//! Scenarios 1, 2, 4 and 5 each hide one of three pre-built mistakes,
//! chosen when the catalog is built; scenario 3 is a fixed three-phase run.

use crate::catalog::{CatalogTemplate, Element, HintLadder, PhaseTemplate, ScenarioTemplate, Variant};
use crate::types::{PhaseId, ScenarioId};

/// Templates for every built-in scenario, in play order.
#[must_use]
pub fn builtin_templates() -> CatalogTemplate {
    CatalogTemplate {
        scenarios: vec![
            mission_control_kits(),
            safehouse_kitchen(),
            evidence_run(),
            witness_interview(),
            parking_surveillance(),
        ],
    }
}

fn variant(kind: &str, elements: Vec<Element>) -> Variant {
    Variant {
        kind: kind.to_string(),
        elements,
    }
}

fn scenario(
    id: u32,
    title: &str,
    setting: &str,
    description: &str,
    icon: &str,
    difficulty: u8,
    phases: Vec<PhaseTemplate>,
) -> ScenarioTemplate {
    ScenarioTemplate {
        id: ScenarioId(id),
        title: title.to_string(),
        setting: setting.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        difficulty,
        phases,
    }
}

struct PhaseText<'a> {
    id: &'a str,
    narrative: &'a str,
    prompt: &'a str,
    success: &'a str,
    hints: [&'a str; 3],
}

fn phase(text: PhaseText<'_>, elements: Vec<Element>, variants: Vec<Variant>) -> PhaseTemplate {
    let [subtle, stronger, explicit] = text.hints;
    PhaseTemplate {
        id: PhaseId::from(text.id),
        narrative: text.narrative.to_string(),
        prompt: text.prompt.to_string(),
        elements,
        variants,
        success_message: text.success.to_string(),
        hints: HintLadder::new(subtle, stronger, explicit),
    }
}

// ---------------------------------------------------------------------------
// 1. Mission Control Kits
// ---------------------------------------------------------------------------

fn mission_control_kits() -> ScenarioTemplate {
    let kit_audit = phase(
        PhaseText {
            id: "kit-audit",
            narrative: "Alright partner, listen carefully. I've got a big case today — a surveillance \
                operation across town. Before I head out, I need to make sure my two field kits are \
                packed properly. The Tech Kit should have all my electronic gear: my phone, the power \
                bank, and a spare battery. The Evidence Kit needs the case folder, the USB drive with \
                the witness interview, and a signed authorization note from the captain. I laid \
                everything out on my desk this morning, but I was in a rush and I think I may have \
                mixed something up. Take a good look at each item and tell me — does anything seem out \
                of place? Remember, every item needs to be in the right kit, nothing should be \
                doubled, and nothing should be missing.",
            prompt: "What looks wrong with the kits?",
            success: "That's it! Nice catch, Detective!",
            hints: [
                "Hmm, not quite. Take another look at what's in each kit.",
                "Think about which items belong in the Tech kit versus the Evidence kit. One of them seems out of place.",
                "Let me help — look at this one.",
            ],
        },
        vec![
            Element::new("phone", "Mobile Phone", "The phone belongs in the Tech Kit."),
            Element::new("power-bank", "Power Bank", "Power bank is correct in the Tech Kit."),
            Element::new("folder", "Case Folder", "The folder belongs in the Evidence Kit."),
            Element::new("usb-drive", "USB Drive", "USB drive is correct in the Evidence Kit."),
            Element::new("signed-note", "Signed Note", "The signed note belongs in the Evidence Kit."),
        ],
        vec![
            variant(
                "wrong-placement",
                vec![Element::target(
                    "spare-battery",
                    "Spare Battery (in Evidence Kit)",
                    "That battery is in the wrong kit — it belongs with the Tech gear!",
                )],
            ),
            variant(
                "duplicate",
                vec![Element::target(
                    "folder-duplicate",
                    "Case Folder (in Tech Kit)",
                    "There's a duplicate folder! This one shouldn't be in the Tech Kit.",
                )],
            ),
            variant(
                "missing-item",
                vec![Element::target(
                    "signed-note-duplicate",
                    "Extra Signed Note",
                    "Wait — there's an extra note here. Something else should be in its place!",
                )],
            ),
        ],
    );

    scenario(
        1,
        "Mission Control Kits",
        "operations-room",
        "Audit Johnny's field kits before a big surveillance op. Something's out of place!",
        "🎒",
        1,
        vec![kit_audit],
    )
}

// ---------------------------------------------------------------------------
// 2. Safehouse Kitchen
// ---------------------------------------------------------------------------

fn safehouse_kitchen() -> ScenarioTemplate {
    let kitchen_check = phase(
        PhaseText {
            id: "kitchen-check",
            narrative: "Okay, I just stopped by the safehouse to grab a quick bite and some coffee \
                before my afternoon shift. I made myself some eggs in the frying pan, boiled water in \
                the kettle for tea, and poured some into my thermos for the road. I also left some \
                important case documents on the counter — they're the witness statements I need to \
                review later. Now, I'm about to head out the door, but before I leave, I need you to \
                look around the kitchen carefully. Is there anything that could be dangerous or cause \
                a problem if I just walk out right now? Think about fire risks, heat damage, and \
                anything time-sensitive. Take your time and look at everything.",
            prompt: "What's not safe in the kitchen?",
            success: "Phew, good thing you caught that! Could have been a disaster.",
            hints: [
                "Close, but that's not the problem. What could go wrong if I leave right now?",
                "Think about what's still running, or what might get damaged if left like this.",
                "Here, let me point it out...",
            ],
        },
        vec![
            Element::new("toaster", "Toaster", "The toaster is off — all good."),
            Element::new("pan-on-stove", "Frying Pan", "The pan is on the stove but the burner is off."),
            Element::new("coffee-mug", "Coffee Mug", "The coffee mug is just sitting on the counter."),
            Element::new("window", "Window", "The window is fine."),
            Element::new("fridge", "Refrigerator", "The fridge is closed — nothing wrong there."),
        ],
        vec![
            variant(
                "appliance-on",
                vec![
                    Element::target(
                        "kettle",
                        "Electric Kettle (ON)",
                        "The kettle is still on! That could be dangerous to leave unattended.",
                    ),
                    Element::new("thermos", "Thermos", "The thermos is safely on the counter."),
                    Element::new("clock", "Wall Clock", "The clock is just telling the time."),
                ],
            ),
            variant(
                "heat-damage",
                vec![
                    Element::new("kettle", "Electric Kettle", "The kettle is turned off."),
                    Element::target(
                        "thermos",
                        "Hot Thermos (on documents)",
                        "That hot thermos is sitting right on important documents — they could get damaged!",
                    ),
                    Element::new(
                        "documents",
                        "Documents",
                        "The documents themselves are fine, but check what's on top of them.",
                    ),
                ],
            ),
            variant(
                "time-mismatch",
                vec![
                    Element::new("kettle", "Electric Kettle", "The kettle is turned off."),
                    Element::target(
                        "clock",
                        "Wall Clock (2:45)",
                        "Look at the time! The note says 'Leave by 2:30' — Johnny is already 15 minutes late!",
                    ),
                    Element::new(
                        "sticky-note",
                        "Note: 'Leave by 2:30'",
                        "The note is a clue — compare it to the clock!",
                    ),
                ],
            ),
        ],
    );

    scenario(
        2,
        "Safehouse Kitchen",
        "safehouse-kitchen",
        "Check the kitchen for hazards before Johnny heads out. Safety first!",
        "🍳",
        1,
        vec![kitchen_check],
    )
}

// ---------------------------------------------------------------------------
// 3. Evidence Run Across Town
// ---------------------------------------------------------------------------

fn evidence_run() -> ScenarioTemplate {
    let route_selection = phase(
        PhaseText {
            id: "route-selection",
            narrative: "Here's the situation: I've got exactly 30 minutes to get across town to the \
                print shop on Baker Street. I need to pick up an important evidence envelope and then \
                deliver it to the police station before they close for the day. I'm looking at the \
                map and I see three possible routes. The Main Road goes straight through — it's the \
                most direct path with clear traffic today. The Park Detour winds through the city \
                park, which is nice and scenic but adds about 20 extra minutes to the trip. Then \
                there's the Construction Shortcut — it cuts through a neighborhood that's under heavy \
                roadworks right now, so the timing is unpredictable. Given that I only have half an \
                hour and this evidence can't be late, which route should I take? Think about what's \
                most reliable.",
            prompt: "Which route is the safest and quickest?",
            success: "Smart choice! The main road is quickest. Let's go.",
            hints: [
                "That route might be tricky. Remember, I only have 30 minutes.",
                "I need the most reliable, direct path. No detours, no surprises.",
                "The main road is the answer — look!",
            ],
        },
        vec![
            Element::new("route-direct", "Main Road (Direct)", "The main road is direct and clear — good choice!"),
            Element::target(
                "route-scenic",
                "Park Detour",
                "The park route adds 20 minutes — too long when we only have 30!",
            ),
            Element::target(
                "route-shortcut",
                "Construction Shortcut",
                "That shortcut goes through roadworks — too unpredictable.",
            ),
        ],
        Vec::new(),
    );

    let street_distractions = phase(
        PhaseText {
            id: "street-distractions",
            narrative: "Great, we're on the main road now and making good time. But as we get closer \
                to Baker Street, I'm noticing a few things along the way that could slow us down or \
                throw us off course. There's a café called \"Quick Beans\" with a big sign outside \
                that says \"Stop in! 2-minute coffee!\" — it smells amazing. Then I see a \
                hand-painted sign pointing down a dark alley that says \"Shortcut this way.\" And up \
                ahead, there's a big crowd gathered around a street performer, blocking part of the \
                sidewalk. There's also the print shop entrance right there on the corner, some people \
                walking by, and a Baker Street sign on the lamppost. I need to stay focused on the \
                mission. Can you point out which things on this street could distract me or lead me \
                astray?",
            prompt: "What could distract us?",
            success: "Right! I'll keep my eyes forward and stay on mission.",
            hints: [
                "That's just part of the street. Look for things that might tempt me to stop or go the wrong way.",
                "I'm in a hurry — what on this street could waste my time?",
                "Look at the distractions!",
            ],
        },
        vec![
            Element::target("coffee-shop", "Quick Beans Café", "That coffee shop smells great, but we can't stop now!"),
            Element::target(
                "shortcut-sign",
                "Alley Shortcut Sign",
                "That sign says 'shortcut' but it leads through a dark alley — not safe.",
            ),
            Element::target(
                "street-performer",
                "Street Performer Crowd",
                "That crowd could slow us down — stay focused!",
            ),
            Element::new("print-shop-door", "Print Shop Entrance", "That's our destination — nothing wrong there!"),
            Element::new("pedestrians", "Passersby", "Just people walking — no distraction there."),
            Element::new("street-signs", "Baker St Sign", "Just a street sign — helpful actually."),
        ],
        Vec::new(),
    );

    let print_shop = phase(
        PhaseText {
            id: "print-shop",
            narrative: "We made it to the print shop! Now here's the tricky part. The clerk has four \
                envelopes on the counter, and they all look similar. I need to pick up the one that \
                matches my case file exactly. Let me check the note the captain gave me this morning. \
                It says: Case number 4712, filed by Officer Martinez, and it must be the ORIGINAL \
                document — not a copy. Look at each envelope carefully. Envelope A says case number \
                4712, Officer Martinez, and it's marked ORIGINAL. Envelope B says case number 4712, \
                but the officer name is \"Martin\" — not Martinez. Envelope C has Martinez's name but \
                the case number is 4721 — the digits are flipped. And Envelope D has the right case \
                number and the right name, but it's stamped as a COPY instead of an ORIGINAL. Which \
                one is the correct envelope?",
            prompt: "Which envelope matches our case?",
            success: "Perfect match! Case #4712, Officer Martinez, original copy. Spot on!",
            hints: [
                "Careful — check every detail. The case number, the name, everything.",
                "Compare each envelope to my note. One detail is always off on the wrong ones.",
                "The correct envelope is right there!",
            ],
        },
        vec![
            Element::new("envelope-a", "Envelope A", "#4712, Martinez, ORIGINAL — that's the one!")
                .with_detail("#4712 · Martinez · ORIGINAL"),
            Element::target("envelope-b", "Envelope B", "Check the officer name — that says 'Martin', not 'Martinez'.")
                .with_detail("#4712 · Martin · ORIGINAL"),
            Element::target("envelope-c", "Envelope C", "Look at the case number carefully — the digits are transposed!")
                .with_detail("#4721 · Martinez · ORIGINAL"),
            Element::target("envelope-d", "Envelope D", "That's a COPY, not an ORIGINAL.")
                .with_detail("#4712 · Martinez · COPY"),
        ],
        Vec::new(),
    );

    scenario(
        3,
        "Evidence Run Across Town",
        "evidence-run",
        "Navigate the city, dodge distractions, and pick up the right evidence envelope.",
        "🚗",
        3,
        vec![route_selection, street_distractions, print_shop],
    )
}

// ---------------------------------------------------------------------------
// 4. Witness Interview Room
// ---------------------------------------------------------------------------

fn witness_interview() -> ScenarioTemplate {
    let interview_review = phase(
        PhaseText {
            id: "interview-review",
            narrative: "Partner, I've got an important interview in 20 minutes and I need to review \
                this witness statement first. Maria Santos came in yesterday and gave her account of \
                what happened on the night of the robbery. I've also got the police report, CCTV \
                footage notes, and two other witness statements to cross-reference. Something in \
                Maria's statement doesn't add up — I can feel it. Read through each detail carefully \
                and compare it to what we already know. Check the dates, the descriptions, the \
                alibis — everything. If something doesn't match, tap on it and let me know.",
            prompt: "What's inconsistent in the statement?",
            success: "Sharp eye, {name}! That inconsistency could crack the case wide open!",
            hints: [
                "That detail checks out. Look for something that contradicts the other evidence we have.",
                "Compare each field to the police report and CCTV notes. One detail doesn't match up.",
                "Here — this is the inconsistency.",
            ],
        },
        vec![
            Element::new("statement-header", "Case Header", "The case header looks correct."),
            Element::new("witness-name", "Witness: Maria Santos", "The witness name matches our records."),
            Element::new("officer-signature", "Officer Signature", "The officer's signature is valid."),
        ],
        vec![
            variant(
                "wrong-date",
                vec![
                    Element::target(
                        "incident-date",
                        "Incident Date: March 15",
                        "Wait — the incident happened on March 17, not March 15! The date is wrong.",
                    ),
                    Element::new("location-field", "Location: 5th & Main", "The location matches the police report."),
                    Element::new("time-field", "Time: 9:30 PM", "The time is consistent with other statements."),
                ],
            ),
            variant(
                "wrong-description",
                vec![
                    Element::target(
                        "suspect-height",
                        "Suspect: 5'6\", brown jacket",
                        "The other witnesses said the suspect was 6'1\" and wore a black jacket — this description doesn't match!",
                    ),
                    Element::new("incident-date", "Incident Date: March 17", "The date is correct."),
                    Element::new("location-field", "Location: 5th & Main", "The location matches."),
                ],
            ),
            variant(
                "contradicting-alibi",
                vec![
                    Element::target(
                        "alibi-claim",
                        "Alibi: 'Was at home all night'",
                        "But the CCTV footage shows this witness at the gas station at 10 PM — the alibi contradicts the evidence!",
                    ),
                    Element::new("incident-date", "Incident Date: March 17", "The date is correct."),
                    Element::new("time-field", "Time: 9:30 PM", "The time is consistent."),
                ],
            ),
        ],
    );

    scenario(
        4,
        "Witness Interview Room",
        "interview-room",
        "Review a witness statement for inconsistencies before the big interview.",
        "📋",
        2,
        vec![interview_review],
    )
}

// ---------------------------------------------------------------------------
// 5. Parking Lot Surveillance
// ---------------------------------------------------------------------------

fn parking_surveillance() -> ScenarioTemplate {
    let lot = phase(
        PhaseText {
            id: "parking-surveillance",
            narrative: "Alright, we've got security camera footage from the parking lot near the crime \
                scene. The suspect is believed to drive a blue sedan with license plate BK-4471. I'm \
                looking at four vehicles in the lot right now. Most of them are clearly not our \
                suspect's car, but one of them looks close — maybe too close. It could be a decoy or \
                a similar vehicle trying to throw us off. I need you to examine each car's details: \
                the color, the model type, and the license plate. Compare them against the suspect \
                vehicle description. If something doesn't match exactly, tap on it and let me know \
                which car is the imposter.",
            prompt: "Which car doesn't match the suspect description?",
            success: "Excellent work, {name}! That car almost fooled us, but you caught the difference!",
            hints: [
                "That vehicle is clearly different. Look for the one that's almost right but has one detail off.",
                "Compare color, model type, AND plate number very carefully. One car has a subtle mismatch.",
                "Let me highlight the imposter for you.",
            ],
        },
        vec![Element::new(
            "description-card",
            "Suspect Vehicle: Blue sedan, plate BK-4471",
            "This is the description we're matching against.",
        )],
        vec![
            variant(
                "wrong-color",
                vec![
                    Element::new("car-a", "Slot A: Blue Sedan, BK-4471", "Blue sedan with matching plate — this looks right!"),
                    Element::target(
                        "car-b",
                        "Slot B: Red Sedan, BK-4471",
                        "Same plate number, but the color is red — the suspect drives a BLUE sedan!",
                    ),
                    Element::new("car-c", "Slot C: Blue SUV, MN-2209", "Different plate and it's an SUV — clearly not our suspect."),
                    Element::new("car-d", "Slot D: White Hatchback, TX-8832", "Wrong type, wrong plate — not suspicious."),
                ],
            ),
            variant(
                "wrong-plate",
                vec![
                    Element::new("car-a", "Slot A: Blue Sedan, BK-4471", "This matches perfectly."),
                    Element::target(
                        "car-b",
                        "Slot B: Blue Sedan, BK-4417",
                        "Almost! The plate says BK-4417 but the suspect's plate is BK-4471 — the digits are swapped!",
                    ),
                    Element::new("car-c", "Slot C: Silver Sedan, JK-1105", "Different color and plate — not our car."),
                    Element::new("car-d", "Slot D: Blue Pickup, RL-6643", "Blue, but it's a pickup truck — not a sedan."),
                ],
            ),
            variant(
                "wrong-model",
                vec![
                    Element::new("car-a", "Slot A: Blue Sedan, BK-4471", "This matches the description."),
                    Element::target(
                        "car-b",
                        "Slot B: Blue Coupe, BK-4471",
                        "Same plate and color, but that's a coupe — the suspect drives a SEDAN!",
                    ),
                    Element::new("car-c", "Slot C: Green Sedan, PQ-3358", "Wrong color and plate — not a match."),
                    Element::new("car-d", "Slot D: Black Van, WZ-9901", "Totally different vehicle."),
                ],
            ),
        ],
    );

    scenario(
        5,
        "Parking Lot Surveillance",
        "parking-lot",
        "Match suspect vehicle details from security footage. One car is an imposter!",
        "📹",
        2,
        vec![lot],
    )
}
