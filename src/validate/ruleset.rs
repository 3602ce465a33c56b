//! Ruleset validation

use super::{check_length, lookup};
use crate::catalog::{ActionName, ConditionFunction};
use crate::error::ValidationError;
use crate::model::{
    Action, ActionInput, Condition, ConditionInput, ConditionParam, ConditionParamInput,
    ParamBinding, Rule, RuleInput, Ruleset, RulesetInput,
};

pub fn ruleset(input: &RulesetInput) -> Result<Ruleset, ValidationError> {
    check_length("name", &input.name, 1, 255)?;

    let rules = input
        .rules
        .iter()
        .map(rule)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ruleset {
        name: input.name.clone(),
        enabled: input.enabled,
        rules,
    })
}

fn rule(input: &RuleInput) -> Result<Rule, ValidationError> {
    let conditions = input
        .conditions
        .iter()
        .map(condition)
        .collect::<Result<Vec<_>, _>>()?;
    let actions = input
        .actions
        .iter()
        .map(action)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        name: input.name.clone(),
        enabled: input.enabled,
        conditions,
        actions,
    })
}

pub fn condition(input: &ConditionInput) -> Result<Condition, ValidationError> {
    let function = lookup(
        "function",
        &input.function,
        ConditionFunction::lookup,
        ConditionFunction::accepted,
    )?;

    let params = input
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| condition_param(index, param))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Condition {
        function,
        negation: input.negation,
        params,
    })
}

pub fn condition_param(
    index: usize,
    input: &ConditionParamInput,
) -> Result<ConditionParam, ValidationError> {
    let binding = match (&input.traffic_pattern_ref, &input.option) {
        (Some(_), Some(_)) => return Err(ValidationError::ParamBindingConflict { index }),
        (Some(pattern), None) => ParamBinding::TrafficPattern(pattern.id),
        (None, Some(option)) => ParamBinding::Option(option.clone()),
        (None, None) => ParamBinding::Unbound,
    };

    Ok(ConditionParam {
        variable: input.variable.clone(),
        value: input.value.clone(),
        binding,
    })
}

pub fn action(input: &ActionInput) -> Result<Action, ValidationError> {
    let action = lookup(
        "action",
        &input.action,
        ActionName::lookup,
        ActionName::accepted,
    )?;

    Ok(Action {
        action,
        params: input.params.clone(),
    })
}
