//! Offline keyword bot.
//!
//! Rules are checked in order against the lower-cased question and the first
//! match answers. A rule is a conjunction of keyword groups: every group
//! must have at least one of its keywords appear as a substring.

use async_trait::async_trait;

use super::Responder;

/// Reply when no rule matches.
pub const DEFAULT_ANSWER: &str = "I don't have specific information about that yet. Please try \
     asking about Formula 1, MotoGP, IndyCar, WEC, Formula E, NASCAR, WRC, or DTM. You can \
     also ask about karting or the differences between racing series.";

const FORMULA_ONE: &str = "Formula 1 (F1) is the highest class of international racing for open-wheel \
     single-seater formula racing cars. The 'formula' in the name refers to the set \
     of rules that all participants' cars must meet. F1 races, or Grands Prix, are \
     held worldwide on both purpose-built circuits and closed public roads. The F1 \
     season consists of a series of races, with points awarded based on finishing \
     positions to determine two annual championships—one for drivers and one for \
     constructors (teams).";

const GREATEST_DRIVER: &str = "The debate over the greatest F1 driver of all time is highly subjective. Lewis \
     Hamilton and Michael Schumacher share the record for most World Championships \
     (7). Hamilton holds records for most wins, pole positions, and podium \
     finishes. Other legendary drivers include Ayrton Senna, known for his raw \
     speed, Juan Manuel Fangio, who won 5 championships in the 1950s, Alain Prost \
     for his calculated driving style, and more recently, Max Verstappen for his \
     aggressive racecraft. The 'greatest' often depends on which qualities—such as \
     raw speed, consistency, adaptability, or championships won—one values most.";

const KARTING: &str = "To get started in karting: 1) Visit local kart tracks to watch races and talk \
     to competitors. 2) Take a karting lesson or enroll in a karting school to \
     learn basics. 3) Purchase appropriate safety gear (helmet, suit, gloves, \
     etc.). 4) Consider renting karts initially before investing in your own. 5) \
     Join a local club and participate in club races to gain experience. 6) As you \
     improve, explore regional and national competitions. Karting is the \
     traditional first step into motorsport, with many F1 drivers starting as young \
     as 5-8 years old in karts.";

const INDYCAR: &str = "IndyCar is the premier open-wheel racing series in North America. The cars \
     feature a standard Dallara chassis with engines from either Honda or \
     Chevrolet. IndyCar races on a mix of oval tracks, road courses, and street \
     circuits, with the Indianapolis 500 being its most prestigious event. The \
     series emphasizes driver skill with more standardized equipment than Formula \
     1, often resulting in closer competition.";

const F1_VS_INDYCAR: &str = "F1 and IndyCar differ in several key ways: 1) Cars: F1 cars are built by \
     individual teams with unique designs, while IndyCar uses a spec chassis with \
     limited customization. 2) Tracks: F1 races primarily on road/street courses, \
     while IndyCar races on a mix of ovals, road courses, and street circuits. 3) \
     Technology: F1 features more advanced aerodynamics and hybrid technology. 4) \
     Speed: On straights, IndyCars can be faster, but F1 cars are quicker around \
     corners. 5) Competition: IndyCar tends to have more varied winners due to \
     standardized equipment, while F1 often sees dominance by top teams. 6) Cost: \
     F1 teams spend hundreds of millions annually, whereas IndyCar operates on a \
     fraction of that budget.";

const MOTOGP: &str = "MotoGP is the premier class of motorcycle road racing events, featuring the \
     most advanced and fastest motorcycles specifically built for racing. It \
     features 1000cc prototypes that are not available for purchase and cannot be \
     legally ridden on public roads. The championship consists of a series of Grand \
     Prix events on circuits around the world, with riders competing for both \
     individual and constructor titles.";

const WEC: &str = "The World Endurance Championship (WEC) is a series of long-distance sports car \
     races, with the famous 24 Hours of Le Mans as its centerpiece. Cars compete in \
     different classes simultaneously on the same track: Hypercars (top class), \
     LMP2 (prototype class), and LMGT3 (production-based cars). Races typically \
     last 6, 8, or 24 hours, with teams of drivers taking turns at the wheel. The \
     championship tests both speed and reliability of cars and endurance of \
     drivers.";

const FORMULA_E: &str = "Formula E is an all-electric single-seater racing championship. Launched in \
     2014, it features races (called E-Prix) primarily on temporary street circuits \
     in major cities worldwide. The series promotes electric vehicle technology and \
     sustainability. Formula E cars have a distinctive design with a maximum power \
     output of 250kW (approximately 335hp) and can reach speeds of up to 280 km/h \
     (174 mph).";

const NASCAR: &str = "NASCAR (National Association for Stock Car Auto Racing) is an American stock \
     car racing series known for its high-speed oval track racing. It features \
     purpose-built race cars with a stock car appearance. NASCAR's premier division \
     is the Cup Series, with races typically consisting of 400-500 miles on oval \
     tracks. The sport is known for its close racing, drafting techniques, and \
     strategic pit stops.";

const WRC: &str = "The World Rally Championship (WRC) is the premier international rally racing \
     series. Unlike circuit racing, rally drivers compete on stages of public or \
     private roads closed for the event, with various surfaces including gravel, \
     tarmac, snow, and ice. Drivers race against the clock rather than directly \
     against each other, with a co-driver providing pace notes. The championship \
     features different classes of cars, with the top Rally1 category featuring \
     hybrid powertrains.";

const DTM: &str = "DTM (Deutsche Tourenwagen Masters) is a German touring car series featuring \
     production-based race cars. Originally exclusively German, it has expanded to \
     include international events. Since 2021, DTM has used GT3 cars, which are \
     based on production sports cars but heavily modified for racing. The series is \
     known for close racing and high levels of manufacturer involvement.";

/// One `(predicate, answer)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqRule {
    all_of: &'static [&'static [&'static str]],
    answer: &'static str,
}

impl FaqRule {
    /// Rule matching when every group has a keyword in the question.
    #[must_use]
    pub const fn new(all_of: &'static [&'static [&'static str]], answer: &'static str) -> Self {
        Self { all_of, answer }
    }

    /// Test against an already lower-cased question.
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|keyword| lowered.contains(keyword)))
    }

    /// The canned answer.
    #[must_use]
    pub fn answer(&self) -> &'static str {
        self.answer
    }
}

// Direct keywords are checked before the compound questions, so a
// question mentioning "f1" gets the Formula 1 answer.
const BUILTIN_RULES: &[FaqRule] = &[
    FaqRule::new(&[&["formula 1"]], FORMULA_ONE),
    FaqRule::new(&[&["f1"]], FORMULA_ONE),
    FaqRule::new(&[&["greatest f1 driver"]], GREATEST_DRIVER),
    FaqRule::new(&[&["karting"]], KARTING),
    FaqRule::new(&[&["indycar"]], INDYCAR),
    FaqRule::new(&[&["f1 vs indycar"]], F1_VS_INDYCAR),
    FaqRule::new(&[&["motogp"]], MOTOGP),
    FaqRule::new(&[&["wec"]], WEC),
    FaqRule::new(&[&["formula e"]], FORMULA_E),
    FaqRule::new(&[&["nascar"]], NASCAR),
    FaqRule::new(&[&["wrc"]], WRC),
    FaqRule::new(&[&["dtm"]], DTM),
    FaqRule::new(&[&["how"], &["start"]], KARTING),
    FaqRule::new(&[&["best", "greatest"], &["driver", "racer"]], GREATEST_DRIVER),
    FaqRule::new(
        &[&["difference", "vs", "versus"], &["f1", "formula 1"], &["indycar"]],
        F1_VS_INDYCAR,
    ),
];

/// Keyword-matching FAQ bot.
#[derive(Debug, Clone)]
pub struct FaqBot {
    rules: Vec<FaqRule>,
    default_answer: &'static str,
}

impl Default for FaqBot {
    fn default() -> Self {
        Self::with_rules(BUILTIN_RULES.to_vec())
    }
}

impl FaqBot {
    /// Bot with the built-in motorsport rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bot with a custom rule list and the standard default answer.
    #[must_use]
    pub fn with_rules(rules: Vec<FaqRule>) -> Self {
        Self {
            rules,
            default_answer: DEFAULT_ANSWER,
        }
    }

    /// Answer a question. Never fails.
    #[must_use]
    pub fn answer(&self, question: &str) -> &'static str {
        let lowered = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(self.default_answer, FaqRule::answer)
    }
}

#[async_trait]
impl Responder for FaqBot {
    async fn respond(&self, question: &str) -> String {
        self.answer(question).to_string()
    }
}
