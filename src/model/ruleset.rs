//! WAF ruleset shapes

use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::catalog::{ActionName, ConditionFunction};

/// Ruleset as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetInput {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<RuleInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub conditions: Vec<ConditionInput>,
    #[serde(default)]
    pub actions: Vec<ActionInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionInput {
    pub function: String,
    #[serde(default)]
    pub negation: bool,
    #[serde(default)]
    pub params: Vec<ConditionParamInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionParamInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_pattern_ref: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<ParamOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInput {
    pub action: String,
    #[serde(default)]
    pub params: Vec<String>,
}

/// Named boolean switch on a condition parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamOption {
    pub name: String,
    pub value: bool,
}

/// Validated ruleset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    pub name: String,
    pub enabled: bool,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub enabled: bool,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub function: ConditionFunction,
    pub negation: bool,
    pub params: Vec<ConditionParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionParam {
    pub variable: Option<String>,
    pub value: Option<String>,
    pub binding: ParamBinding,
}

/// What a condition parameter is additionally bound to, if anything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamBinding {
    #[default]
    Unbound,
    TrafficPattern(i64),
    Option(ParamOption),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action: ActionName,
    pub params: Vec<String>,
}

impl From<&ConditionParam> for ConditionParamInput {
    fn from(param: &ConditionParam) -> Self {
        let mut input = ConditionParamInput {
            variable: param.variable.clone(),
            value: param.value.clone(),
            ..Default::default()
        };
        match &param.binding {
            ParamBinding::Unbound => {}
            ParamBinding::TrafficPattern(id) => input.traffic_pattern_ref = Some(ObjectRef::new(*id)),
            ParamBinding::Option(option) => input.option = Some(option.clone()),
        }
        input
    }
}

impl From<&Condition> for ConditionInput {
    fn from(condition: &Condition) -> Self {
        Self {
            function: condition.function.as_str().to_string(),
            negation: condition.negation,
            params: condition.params.iter().map(ConditionParamInput::from).collect(),
        }
    }
}

impl From<&Action> for ActionInput {
    fn from(action: &Action) -> Self {
        Self {
            action: action.action.as_str().to_string(),
            params: action.params.clone(),
        }
    }
}

impl From<&Rule> for RuleInput {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name.clone(),
            enabled: rule.enabled,
            conditions: rule.conditions.iter().map(ConditionInput::from).collect(),
            actions: rule.actions.iter().map(ActionInput::from).collect(),
        }
    }
}

impl From<&Ruleset> for RulesetInput {
    fn from(ruleset: &Ruleset) -> Self {
        Self {
            name: ruleset.name.clone(),
            enabled: ruleset.enabled,
            rules: ruleset.rules.iter().map(RuleInput::from).collect(),
        }
    }
}
