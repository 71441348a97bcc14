//! End-to-end flow: load content, build the graph, bind cards, play choices.

use std::cell::RefCell;
use std::rc::Rc;

use card_engine::{
    bind_template, AdvanceOutcome, CardLibrary, ChoiceSide, NarrativeSession, SelectionPolicy,
    SessionEvent, SocialGraph, PLAYER_ROLE,
};
use family_rules::{Character, CharacterId, Family, SessionConfig, Stat};

const CONTENT: &str = r#"
{
    "0": {
        "ID": "3f2b4c66-70b1-4a69-a7dd-5b1f0c3a9d10",
        "NumRoles": 2,
        "Scenario": "[[X]] invites [[Y]] and [[P]] to dinner",
        "Roles": ["[[X]]", "[[Y]]"],
        "Preconditions": [
            {"Type": "HasMet", "RoleOne": "[[X]]", "RoleTwo": "[[Y]]"}
        ],
        "Choices": [
            {
                "ChoiceText": "Toast to [[X]]",
                "CompatibilityModifier": 2,
                "StatModifiers": [{"Stat": "Money", "Value": -10}],
                "EdgeModifiers": [
                    {
                        "RoleOne": "[[X]]",
                        "RoleTwo": "[[Y]]",
                        "PositiveModifier": 0.3,
                        "NegativeModifier": 0.0
                    }
                ],
                "FollowupCard": "1"
            },
            {
                "ChoiceText": "Decline politely",
                "CompatibilityModifier": -1,
                "StatModifiers": [{"Stat": "Reputation", "Value": -5}],
                "EdgeModifiers": [],
                "FollowupCard": "null"
            }
        ]
    },
    "1": {
        "ID": "3f2b4c66-70b1-4a69-a7dd-5b1f0c3a9d11",
        "NumRoles": 2,
        "Scenario": "[[Y]] thanks [[X]] for the evening",
        "Roles": ["[[X]]", "[[Y]]"],
        "Choices": [
            {
                "ChoiceText": "Stay a while longer",
                "CompatibilityModifier": 1,
                "StatModifiers": [{"Stat": "Health", "Value": 5}],
                "EdgeModifiers": [],
                "FollowupCard": ""
            },
            {
                "ChoiceText": "Head home",
                "CompatibilityModifier": 0,
                "StatModifiers": [],
                "EdgeModifiers": [],
                "FollowupCard": "null"
            }
        ]
    }
}
"#;

struct Setup {
    graph: SocialGraph,
    player: CharacterId,
    pool: Vec<CharacterId>,
}

fn setup_household() -> Setup {
    let members = vec![
        Character::new("Alice", "Harlow").with_age(29),
        Character::new("Bram", "Harlow").with_age(34),
        Character::new("Cleo", "Harlow").with_age(61),
    ];
    let pool: Vec<CharacterId> = members.iter().map(|m| m.id).collect();
    // Alice-Bram and Bram-Cleo know each other; Alice-Cleo do not.
    let family = Family::new("Harlow", members, vec![(0, 1), (1, 2)]).unwrap();

    let mut graph = SocialGraph::from_family(&family);
    let player = graph.add_character(Character::new("Piers", "Quill").with_age(27));

    Setup {
        graph,
        player,
        pool,
    }
}

#[test]
fn full_session_with_followup_and_effects() {
    let setup = setup_household();
    let (alice, bram) = (setup.pool[0], setup.pool[1]);
    let library = CardLibrary::load_from_str(CONTENT).unwrap();

    let mut session = NarrativeSession::new(
        SessionConfig::default(),
        setup.graph,
        setup.player,
        &setup.pool,
        library,
        SelectionPolicy::PreconditionFiltered,
    );

    let weeks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&weeks);
    session.subscribe(move |event| {
        if let SessionEvent::CardSelected { week, .. } = event {
            sink.borrow_mut().push(*week);
        }
    });

    // The first pairing that has met is (Alice, Bram).
    assert_eq!(session.begin().unwrap(), AdvanceOutcome::Presented);
    let card = session.current_card().unwrap();
    assert_eq!(
        card.scenario(),
        "Alice Harlow invites Bram Harlow and Piers Quill to dinner"
    );
    assert_eq!(card.choice_text(ChoiceSide::One), "Toast to Alice Harlow");

    // Choosing the toast spends money, warms the Alice-Bram edge, and leads
    // into the followup scene with the same cast.
    assert_eq!(session.choose(ChoiceSide::One).unwrap(), AdvanceOutcome::Presented);

    assert_eq!(session.stats().get(Stat::Money), 40);
    assert_eq!(session.compatibility(), 2);
    let pair = session.graph().affinity_between(alice, bram).unwrap();
    assert!((pair.positive - 0.3).abs() < 0.001);

    let followup = session.current_card().unwrap();
    assert_eq!(
        followup.scenario(),
        "Bram Harlow thanks Alice Harlow for the evening"
    );
    assert_eq!(followup.role_character("[[X]]"), Some(alice));
    assert_eq!(followup.role_character(PLAYER_ROLE), Some(setup.player));

    // Finishing the followup falls back to the filtered pool. The skipped
    // (Alice, Cleo) pairing never met, so (Bram, Cleo) is next on "0".
    assert_eq!(session.choose(ChoiceSide::One).unwrap(), AdvanceOutcome::Presented);
    assert_eq!(session.stats().get(Stat::Health), 55);
    let third = session.current_card().unwrap();
    assert_eq!(
        third.scenario(),
        "Bram Harlow invites Cleo Harlow and Piers Quill to dinner"
    );

    // Declining costs reputation; the ungated "thanks" cards still remain in
    // the pending pool.
    assert_eq!(session.choose(ChoiceSide::Two).unwrap(), AdvanceOutcome::Presented);
    assert_eq!(session.stats().get(Stat::Reputation), 45);
    assert_eq!(session.compatibility(), 2);
    assert_eq!(
        session.current_card().unwrap().scenario(),
        "Bram Harlow thanks Alice Harlow for the evening"
    );

    // Heading home through the rest of the pool drains it.
    assert_eq!(session.choose(ChoiceSide::Two).unwrap(), AdvanceOutcome::Presented);
    assert_eq!(session.choose(ChoiceSide::Two).unwrap(), AdvanceOutcome::Presented);
    assert_eq!(session.choose(ChoiceSide::Two).unwrap(), AdvanceOutcome::Exhausted);
    assert!(session.current_card().is_none());

    // One CardSelected per presented card, stamped with the week it opened.
    assert_eq!(weeks.borrow().as_slice(), [1, 2, 3, 4, 5, 6]);
    assert_eq!(session.week(), 7);
    assert_eq!(session.compatibility(), 2);
}

#[test]
fn binder_output_matches_template_combinatorics() {
    let setup = setup_household();
    let library = CardLibrary::load_from_str(CONTENT).unwrap();
    let template = library.template("0").unwrap();

    let cards = bind_template(template, &setup.pool, setup.player, &setup.graph);

    // C(3, 2) pairings, each also carrying the player binding.
    assert_eq!(cards.len(), 3);
    for card in &cards {
        assert_eq!(card.role_map().len(), 3);
        assert_eq!(card.role_character(PLAYER_ROLE), Some(setup.player));
    }
}

#[test]
fn config_overrides_flow_into_session() {
    let setup = setup_household();
    let config = SessionConfig::from_toml_str(
        r#"
        [stats.money]
        start = 5
        range = { min = 0, max = 10 }
        "#,
    )
    .unwrap();
    let library = CardLibrary::load_from_str(CONTENT).unwrap();

    let mut session = NarrativeSession::new(
        config,
        setup.graph,
        setup.player,
        &setup.pool,
        library,
        SelectionPolicy::Sequential,
    );

    session.begin().unwrap();
    session.choose(ChoiceSide::One).unwrap();

    // -10 money against a floor of 0.
    assert_eq!(session.stats().get(Stat::Money), 0);
}
