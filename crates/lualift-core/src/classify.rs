//! Semantic classification: ordered rule lists that turn a declaration
//! right-hand side (or a function body) into a category and a candidate
//! name.
//!
//! Rules are explicit enum variants evaluated in [`VarRule::ALL`] /
//! [`FnRule::ALL`] order and the first match wins. The order encodes a
//! priority of specificity: a service lookup is unambiguous and must be
//! checked before the generic member-access fallback, and a boolean
//! return is checked before a property return so validation functions
//! are not misclassified as getters. Reordering changes engine
//! behavior and is a breaking change to the heuristic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::{Declaration, FunctionDef, PropertyUsageIndex};

// ============================================================================
// Types
// ============================================================================

/// A classified rename suggestion, before uniqueness resolution.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub old_name: String,
    pub category: &'static str,
    pub suggestion: String,
}

// ============================================================================
// Lookup Tables
// ============================================================================

/// Friendlier names for common `Instance.new` class strings; unmapped
/// classes use the class string itself.
const CLASS_ALIASES: &[(&str, &str)] = &[
    ("ScreenGui", "MainGui"),
    ("TextLabel", "Label"),
    ("TextButton", "Button"),
    ("ImageLabel", "Image"),
    ("RemoteEvent", "Event"),
    ("BindableEvent", "Event"),
    ("IntValue", "Counter"),
    ("StringValue", "Stored"),
];

/// Properties preferred as naming cues when falling back to observed
/// usage.
const PREFERRED_PROPERTIES: &[&str] = &[
    "LocalPlayer",
    "Character",
    "Humanoid",
    "Position",
    "Parent",
    "Name",
    "Text",
    "Value",
];

// ============================================================================
// Variable Rules
// ============================================================================

static SERVICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"GetService\s*\(\s*["']([A-Za-z_]\w*)["']"#).expect("service pattern is valid")
});

static INSTANCE_NEW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bInstance\s*\.\s*new\s*\(\s*["']([A-Za-z_]\w*)["']"#)
        .expect("instance pattern is valid")
});

static ROOT_CHAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:game|workspace|script)((?:\.[A-Za-z_]\w*)+)$")
        .expect("chain pattern is valid")
});

static VECTOR_CTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Vector3|Vector2|UDim2|UDim|CFrame|Color3)\s*\.\s*new\s*\(")
        .expect("vector pattern is valid")
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|\.\d+)$")
        .expect("number pattern is valid")
});

static LONGSTR_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[=*\[").expect("long string pattern is valid"));

static CHAINED_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":\s*[A-Za-z_]\w*\s*\([^()]*\)\s*[:.]").expect("chained call pattern is valid")
});

static METHOD_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.:]\s*[A-Za-z_]\w*\s*\(").expect("method call pattern is valid"));

static ARITHMETIC_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\s.+\-*/%^()]+$").expect("arithmetic pattern is valid"));

static OPERATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\-*/%^]").expect("operator pattern is valid"));

/// Ordered variable classification rules; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRule {
    ServiceLookup,
    ConstructorClass,
    RootMemberChain,
    VectorCtor,
    BooleanLiteral,
    NilLiteral,
    NumericLiteral,
    StringLiteral,
    TableCtor,
    ChainedCall,
    MethodCall,
    Arithmetic,
}

impl VarRule {
    /// Evaluation order. Part of the engine contract.
    pub const ALL: &'static [VarRule] = &[
        VarRule::ServiceLookup,
        VarRule::ConstructorClass,
        VarRule::RootMemberChain,
        VarRule::VectorCtor,
        VarRule::BooleanLiteral,
        VarRule::NilLiteral,
        VarRule::NumericLiteral,
        VarRule::StringLiteral,
        VarRule::TableCtor,
        VarRule::ChainedCall,
        VarRule::MethodCall,
        VarRule::Arithmetic,
    ];

    /// Category label attached to candidates produced by this rule.
    pub fn label(&self) -> &'static str {
        match self {
            VarRule::ServiceLookup => "service",
            VarRule::ConstructorClass => "instance",
            VarRule::RootMemberChain => "member",
            VarRule::VectorCtor => "datatype",
            VarRule::BooleanLiteral => "boolean",
            VarRule::NilLiteral => "nil",
            VarRule::NumericLiteral => "number",
            VarRule::StringLiteral => "string",
            VarRule::TableCtor => "table",
            VarRule::ChainedCall | VarRule::MethodCall => "call",
            VarRule::Arithmetic => "arithmetic",
        }
    }

    /// Evaluate this rule against a trimmed right-hand-side expression.
    pub fn evaluate(&self, rhs: &str) -> Option<String> {
        match self {
            VarRule::ServiceLookup => SERVICE_RE.captures(rhs).map(|c| c[1].to_string()),
            VarRule::ConstructorClass => {
                INSTANCE_NEW_RE.captures(rhs).map(|c| alias_for(&c[1]))
            }
            VarRule::RootMemberChain => ROOT_CHAIN_RE.captures(rhs).and_then(|c| {
                c[1].rsplit('.').next().map(|segment| segment.to_string())
            }),
            VarRule::VectorCtor => VECTOR_CTOR_RE
                .captures(rhs)
                .map(|c| format!("{}Value", &c[1])),
            VarRule::BooleanLiteral => {
                (rhs == "true" || rhs == "false").then(|| "Enabled".to_string())
            }
            VarRule::NilLiteral => (rhs == "nil").then(|| "Value".to_string()),
            VarRule::NumericLiteral => NUMBER_RE.is_match(rhs).then(|| "Number".to_string()),
            VarRule::StringLiteral => is_string_literal(rhs).then(|| "Text".to_string()),
            VarRule::TableCtor => rhs.starts_with('{').then(|| "Table".to_string()),
            VarRule::ChainedCall => CHAINED_CALL_RE.is_match(rhs).then(|| "Result".to_string()),
            VarRule::MethodCall => METHOD_CALL_RE.is_match(rhs).then(|| "Result".to_string()),
            VarRule::Arithmetic => (ARITHMETIC_CHARS_RE.is_match(rhs)
                && OPERATOR_RE.is_match(rhs))
            .then(|| "Calculation".to_string()),
        }
    }
}

fn alias_for(class: &str) -> String {
    CLASS_ALIASES
        .iter()
        .find(|(from, _)| *from == class)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| class.to_string())
}

fn is_string_literal(rhs: &str) -> bool {
    let quoted = |q: char| rhs.len() >= 2 && rhs.starts_with(q) && rhs.ends_with(q);
    quoted('"') || quoted('\'') || LONGSTR_OPEN_RE.is_match(rhs)
}

/// Classify one declaration.
///
/// Falls back to the property-usage index when no right-hand-side rule
/// matches, and to the generic `Var` label after that; every
/// declaration gets a suggestion.
pub fn classify_declaration(decl: &Declaration, props: &PropertyUsageIndex) -> Candidate {
    let rhs = decl.rhs.trim();
    if !rhs.is_empty() {
        for rule in VarRule::ALL {
            if let Some(suggestion) = rule.evaluate(rhs) {
                return Candidate {
                    old_name: decl.name.clone(),
                    category: rule.label(),
                    suggestion: capitalize(&suggestion),
                };
            }
        }
    }
    let observed = props.properties_of(&decl.name);
    if let Some(preferred) = PREFERRED_PROPERTIES
        .iter()
        .find(|p| observed.iter().any(|o| o == *p))
    {
        return Candidate {
            old_name: decl.name.clone(),
            category: "property",
            suggestion: (*preferred).to_string(),
        };
    }
    if let Some(first) = observed.first() {
        return Candidate {
            old_name: decl.name.clone(),
            category: "property",
            suggestion: capitalize(first),
        };
    }
    Candidate {
        old_name: decl.name.clone(),
        category: "var",
        suggestion: "Var".to_string(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// Function Rules
// ============================================================================

static CHECK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"return\s+(?:true|false)\b|return\s+not\b|return\s+[^\n]*(?:==|~=|<=|>=|<|>)")
        .expect("check pattern is valid")
});

static REMOVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.:]\s*(?:Destroy|Remove|Delete)\w*\s*\(").expect("remove pattern is valid")
});

static CREATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bInstance\s*\.\s*new\b|\.\s*Parent\s*=|[.:]\s*Clone\s*\(")
        .expect("create pattern is valid")
});

static HANDLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[.:]\s*[Cc]onnect\s*\(|\b(?:ChildAdded|ChildRemoved|PlayerAdded|PlayerRemoving|Touched|Changed|Heartbeat|RenderStepped)\b",
    )
    .expect("handle pattern is valid")
});

static ITERATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bGetChildren\b|\bpairs\s*\(|\bipairs\s*\(|\bfor\b[^\n]*\bin\b[^\n]*\bdo\b")
        .expect("iterate pattern is valid")
});

static LOOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfor\b|\bwhile\b").expect("loop pattern is valid"));

static IF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bif\b").expect("if pattern is valid"));

static UPDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)update|refresh").expect("update pattern is valid"));

static RENDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)render|draw|display").expect("render pattern is valid"));

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)init|setup").expect("init pattern is valid"));

static GET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"return\s+[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)+").expect("get pattern is valid")
});

static PROP_ASSIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\s*[A-Za-z_]\w*\s*=[^=]").expect("property assign pattern is valid")
});

static LOCAL_KW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blocal\b").expect("local pattern is valid"));

static PARSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bstring\s*\.\s*\w+|[.:]\s*(?:sub|gsub|match|gmatch|find|format|upper|lower|len|byte|char|rep)\s*\(",
    )
    .expect("parse pattern is valid")
});

/// Ordered function classification rules; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnRule {
    Check,
    Remove,
    Create,
    Handle,
    Iterate,
    Filter,
    Update,
    Render,
    Init,
    Get,
    Set,
    Parse,
    Calculate,
}

impl FnRule {
    /// Evaluation order. Part of the engine contract.
    pub const ALL: &'static [FnRule] = &[
        FnRule::Check,
        FnRule::Remove,
        FnRule::Create,
        FnRule::Handle,
        FnRule::Iterate,
        FnRule::Filter,
        FnRule::Update,
        FnRule::Render,
        FnRule::Init,
        FnRule::Get,
        FnRule::Set,
        FnRule::Parse,
        FnRule::Calculate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FnRule::Check => "check",
            FnRule::Remove => "remove",
            FnRule::Create => "create",
            FnRule::Handle => "handle",
            FnRule::Iterate => "iterate",
            FnRule::Filter => "filter",
            FnRule::Update => "update",
            FnRule::Render => "render",
            FnRule::Init => "init",
            FnRule::Get => "get",
            FnRule::Set => "set",
            FnRule::Parse => "parse",
            FnRule::Calculate => "calculate",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            FnRule::Check => "Check",
            FnRule::Remove => "Remove",
            FnRule::Create => "Create",
            FnRule::Handle => "Handle",
            FnRule::Iterate => "Iterate",
            FnRule::Filter => "Filter",
            FnRule::Update => "Update",
            FnRule::Render => "Render",
            FnRule::Init => "Init",
            FnRule::Get => "Get",
            FnRule::Set => "Set",
            FnRule::Parse => "Parse",
            FnRule::Calculate => "Calculate",
        }
    }

    /// Evaluate this rule against a function body.
    pub fn matches(&self, body: &str) -> bool {
        match self {
            FnRule::Check => CHECK_RE.is_match(body),
            FnRule::Remove => REMOVE_RE.is_match(body),
            FnRule::Create => CREATE_RE.is_match(body),
            FnRule::Handle => HANDLE_RE.is_match(body),
            FnRule::Iterate => ITERATE_RE.is_match(body),
            FnRule::Filter => LOOP_RE.is_match(body) && IF_RE.is_match(body),
            FnRule::Update => UPDATE_RE.is_match(body),
            FnRule::Render => RENDER_RE.is_match(body),
            FnRule::Init => INIT_RE.is_match(body),
            FnRule::Get => GET_RE.is_match(body) && !has_assignment(body),
            FnRule::Set => PROP_ASSIGN_RE.is_match(body) && !LOCAL_KW_RE.is_match(body),
            FnRule::Parse => PARSE_RE.is_match(body),
            FnRule::Calculate => OPERATOR_RE.is_match(body),
        }
    }
}

/// True when the body assigns anything (comparison operators excluded).
fn has_assignment(body: &str) -> bool {
    body.replace("==", "")
        .replace("~=", "")
        .replace("<=", "")
        .replace(">=", "")
        .contains('=')
}

/// Classify one function by its body; falls back to `Process` when the
/// function takes parameters and `Handler` otherwise.
pub fn classify_function(func: &FunctionDef) -> Candidate {
    for rule in FnRule::ALL {
        if rule.matches(&func.body) {
            return Candidate {
                old_name: func.name.clone(),
                category: rule.label(),
                suggestion: rule.suggestion().to_string(),
            };
        }
    }
    if func.params.trim().is_empty() {
        Candidate {
            old_name: func.name.clone(),
            category: "handler",
            suggestion: "Handler".to_string(),
        }
    } else {
        Candidate {
            old_name: func.name.clone(),
            category: "process",
            suggestion: "Process".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
