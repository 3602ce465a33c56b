//! Ruleset transformation

use crate::catalog::{ActionName, ConditionFunction};
use crate::error::ConsistencyError;
use crate::model::{
    Action, Condition, ConditionParam, ParamBinding, ParamOption, Rule, Ruleset,
};
use crate::wire::{
    ActionWire, ConditionParamWire, ConditionWire, ParamOptionWire, RefWire, RuleWire,
    RulesetWire,
};

/// Ruleset payload; the same shape is sent on create and on PATCH
pub fn to_wire(ruleset: &Ruleset) -> RulesetWire {
    RulesetWire {
        id: None,
        name: Some(ruleset.name.clone()),
        enabled: Some(ruleset.enabled),
        customer_ref: None,
        rules: ruleset.rules.iter().map(rule_to_wire).collect(),
    }
}

fn rule_to_wire(rule: &Rule) -> RuleWire {
    RuleWire {
        name: rule.name.clone(),
        enabled: rule.enabled,
        conditions: rule.conditions.iter().map(condition_to_wire).collect(),
        actions: rule.actions.iter().map(action_to_wire).collect(),
    }
}

pub fn condition_to_wire(condition: &Condition) -> ConditionWire {
    ConditionWire {
        function: condition.function.as_str().to_string(),
        negation: condition.negation,
        params: condition.params.iter().map(param_to_wire).collect(),
    }
}

fn param_to_wire(param: &ConditionParam) -> ConditionParamWire {
    let mut wire = ConditionParamWire {
        variable: param.variable.clone(),
        value: param.value.clone(),
        ..Default::default()
    };
    match &param.binding {
        ParamBinding::Unbound => {}
        ParamBinding::TrafficPattern(id) => wire.traffic_pattern_ref = Some(RefWire { id: *id }),
        ParamBinding::Option(option) => {
            wire.option = Some(ParamOptionWire {
                name: option.name.clone(),
                value: option.value,
            })
        }
    }
    wire
}

pub fn action_to_wire(action: &Action) -> ActionWire {
    ActionWire {
        action: action.action.as_str().to_string(),
        params: action.params.clone(),
    }
}

pub fn from_wire(wire: &RulesetWire) -> Result<Ruleset, ConsistencyError> {
    let name = wire
        .name
        .clone()
        .ok_or(ConsistencyError::MissingAttribute("name"))?;

    let rules = wire
        .rules
        .iter()
        .map(rule_from_wire)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ruleset {
        name,
        enabled: wire.enabled.unwrap_or(false),
        rules,
    })
}

fn rule_from_wire(wire: &RuleWire) -> Result<Rule, ConsistencyError> {
    let conditions = wire
        .conditions
        .iter()
        .map(condition_from_wire)
        .collect::<Result<Vec<_>, _>>()?;
    let actions = wire
        .actions
        .iter()
        .map(action_from_wire)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        name: wire.name.clone(),
        enabled: wire.enabled,
        conditions,
        actions,
    })
}

pub fn condition_from_wire(wire: &ConditionWire) -> Result<Condition, ConsistencyError> {
    let function = ConditionFunction::lookup(&wire.function)
        .ok_or_else(|| ConsistencyError::UnknownFunction(wire.function.clone()))?;

    let params = wire
        .params
        .iter()
        .map(param_from_wire)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Condition {
        function,
        negation: wire.negation,
        params,
    })
}

fn param_from_wire(wire: &ConditionParamWire) -> Result<ConditionParam, ConsistencyError> {
    let binding = match (&wire.traffic_pattern_ref, &wire.option) {
        (Some(_), Some(_)) => {
            return Err(ConsistencyError::ConflictingVariants {
                field: "condition parameter binding".to_string(),
            })
        }
        (Some(pattern), None) => ParamBinding::TrafficPattern(pattern.id),
        (None, Some(option)) => ParamBinding::Option(ParamOption {
            name: option.name.clone(),
            value: option.value,
        }),
        (None, None) => ParamBinding::Unbound,
    };

    Ok(ConditionParam {
        variable: wire.variable.clone(),
        value: wire.value.clone(),
        binding,
    })
}

pub fn action_from_wire(wire: &ActionWire) -> Result<Action, ConsistencyError> {
    let action = ActionName::lookup(&wire.action)
        .ok_or_else(|| ConsistencyError::UnknownAction(wire.action.clone()))?;

    Ok(Action {
        action,
        params: wire.params.clone(),
    })
}
