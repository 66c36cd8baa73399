use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::factory::resolve::{ChildKind, FactoryNode};
use crate::factory::template::{Args, Update, substitute, substitute_value};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::lines::SourceLines;

/// Upper bound on widgets produced by one generate rule.
pub const MAX_GENERATED: usize = 1 << 16;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// One widget of one frame, fully resolved.
pub struct WidgetInstruction {
    /// Dotpath of include names, with `[i,j]` for generated widgets.
    pub key: String,
    /// Widget payload after all updates.
    pub data: Map<String, Value>,
    /// Depth-first include order; compositing order.
    pub position: usize,
    /// Range indices of generated widgets, empty otherwise.
    pub array_position: Vec<usize>,
    /// Widget `type`.
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Grid alias of a widget plus its compositing position.
pub struct AliasIdentity {
    pub alias: String,
    pub z_position: usize,
}

impl WidgetInstruction {
    /// Field at a dotted path such as `grid.location`.
    pub fn field(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let mut value = self.data.get(parts.next()?)?;
        for part in parts {
            value = value.as_object()?.get(part)?;
        }
        Some(value)
    }

    /// Non-empty string field at a dotted path.
    pub fn field_str(&self, dotted: &str) -> Option<&str> {
        self.field(dotted)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn grid_location(&self) -> Option<&str> {
        self.field_str("grid.location")
    }

    pub fn grid_alias(&self) -> Option<&str> {
        self.field_str("grid.alias")
    }

    pub fn alias_identity(&self) -> Option<AliasIdentity> {
        self.grid_alias().map(|alias| AliasIdentity {
            alias: alias.to_string(),
            z_position: self.position,
        })
    }

    fn ordering(&self) -> (usize, &[usize]) {
        (self.position, &self.array_position)
    }
}

/// Widgets of one frame in compositing order, looked up by key.
#[derive(Clone, Debug, Default)]
pub struct FrameWidgets {
    frame: usize,
    widgets: Vec<WidgetInstruction>,
    index: HashMap<String, usize>,
}

impl FrameWidgets {
    /// Order `widgets` by `(position, arrayPosition)` and index them.
    pub fn new(frame: usize, mut widgets: Vec<WidgetInstruction>) -> Self {
        widgets.sort_by(|a, b| a.ordering().cmp(&b.ordering()));
        let index = widgets
            .iter()
            .enumerate()
            .map(|(i, w)| (w.key.clone(), i))
            .collect();
        Self {
            frame,
            widgets,
            index,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn get(&self, key: &str) -> Option<&WidgetInstruction> {
        self.index.get(key).map(|&i| &self.widgets[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WidgetInstruction> {
        self.widgets.iter()
    }

    /// Widgets whose `type` is `tag`.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a WidgetInstruction> + 'a {
        self.widgets.iter().filter(move |w| w.tag == tag)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().map(|w| w.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl<'a> IntoIterator for &'a FrameWidgets {
    type Item = &'a WidgetInstruction;
    type IntoIter = std::slice::Iter<'a, WidgetInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.widgets.iter()
    }
}

/// Updates addressed to a descendant, already bound to the sender's arguments.
#[derive(Clone, Debug)]
struct Passed {
    target: Vec<String>,
    updates: Vec<Update>,
}

#[derive(Clone, Debug, Default)]
struct ChildPlan {
    bindings: Args,
    updates: Vec<Update>,
    passed: Vec<Passed>,
}

/// Depth-first walk producing the widgets of one frame.
pub(crate) struct FrameWalker<'a> {
    sources: &'a SourceLines,
    frame: usize,
    position: usize,
}

impl<'a> FrameWalker<'a> {
    pub(crate) fn new(sources: &'a SourceLines, frame: usize) -> Self {
        Self {
            sources,
            frame,
            position: 0,
        }
    }

    /// Widgets of `root`, unordered.
    pub(crate) fn walk(mut self, root: &FactoryNode) -> CardResult<Vec<WidgetInstruction>> {
        self.node(root, "", &Args::new(), &[])
    }

    fn node(
        &mut self,
        node: &FactoryNode,
        prefix: &str,
        args: &Args,
        inherited: &[Passed],
    ) -> CardResult<Vec<WidgetInstruction>> {
        let mut plans = vec![ChildPlan::default(); node.children.len()];

        let create = &node.factory.create;
        if !create.is_empty() {
            for (target, fields) in &create[self.frame % create.len()] {
                let updates = Update::parse_fields(fields)
                    .iter()
                    .map(|u| u.bind(args))
                    .collect();
                let path: Vec<String> = target.split('.').map(str::to_string).collect();
                self.route(node, &mut plans, &path, updates)?;
            }
        }
        // Nearest ancestor first, so the outermost sender is applied last.
        for passed in inherited {
            self.route(node, &mut plans, &passed.target, passed.updates.clone())?;
        }

        let mut out = Vec::new();
        for (child, plan) in node.children.iter().zip(plans) {
            let key = if prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{prefix}.{}", child.name)
            };
            match &child.kind {
                ChildKind::Widget(data) => {
                    let mut data: Map<String, Value> = data
                        .iter()
                        .map(|(k, v)| (k.clone(), substitute_value(v, args)))
                        .collect();
                    for update in &plan.updates {
                        update.apply(&mut data);
                    }
                    out.push(WidgetInstruction {
                        tag: type_of(&data),
                        key,
                        data,
                        position: self.position,
                        array_position: Vec::new(),
                    });
                    self.position += 1;
                }
                ChildKind::Factory(inner) => {
                    let widgets = self.node(inner, &key, &plan.bindings, &plan.passed)?;
                    out.extend(widgets);
                }
            }
        }

        self.expand(node, prefix, args, &mut out)?;
        Ok(out)
    }

    fn route(
        &self,
        node: &FactoryNode,
        plans: &mut [ChildPlan],
        target: &[String],
        updates: Vec<Update>,
    ) -> CardResult<()> {
        let unknown = || CardError::UnknownTarget {
            source_ref: self.sources.describe(&node.source, &target.join(".")),
            target: target.join("."),
        };
        let (first, rest) = target.split_first().ok_or_else(unknown)?;
        let idx = node
            .children
            .iter()
            .position(|c| c.name == *first)
            .ok_or_else(unknown)?;

        let plan = &mut plans[idx];
        match (&node.children[idx].kind, rest.is_empty()) {
            (ChildKind::Widget(_), true) => plan.updates.extend(updates),
            (ChildKind::Widget(_), false) => return Err(unknown()),
            (ChildKind::Factory(inner), true) => {
                for update in updates {
                    let name = update.path().join(".");
                    if !inner.factory.declares(&name) {
                        return Err(CardError::UndeclaredArgument {
                            factory: inner.uri.clone(),
                            name,
                        });
                    }
                    plan.bindings.insert(name, update.into_value());
                }
            }
            (ChildKind::Factory(_), false) => plan.passed.push(Passed {
                target: rest.to_vec(),
                updates,
            }),
        }
        Ok(())
    }

    /// Replace generate targets with their expansions.
    fn expand(
        &self,
        node: &FactoryNode,
        prefix: &str,
        args: &Args,
        out: &mut Vec<WidgetInstruction>,
    ) -> CardResult<()> {
        for rule in &node.factory.generate {
            let invalid = |message: String| {
                CardError::generate(self.sources.describe(&node.source, "generate"), message)
            };

            let vars = rule.variables().map_err(invalid)?;
            if vars.is_empty() || vars.len() != rule.range.len() {
                return Err(invalid(format!(
                    "{} variables declared for {} ranges",
                    vars.len(),
                    rule.range.len()
                )));
            }
            let ranges = rule
                .range
                .iter()
                .map(|r| parse_range(&substitute(r, args)))
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?;
            let combos = combinations(&ranges).map_err(invalid)?;
            if rule.action.is_empty() {
                return Err(invalid("rule has no action".to_string()));
            }

            for (target, fields) in &rule.action {
                if let Some((field, _)) = fields.iter().find(|(_, t)| t.is_empty()) {
                    return Err(invalid(format!("{target}.{field} has no templates")));
                }
                let full = if prefix.is_empty() {
                    target.clone()
                } else {
                    format!("{prefix}.{target}")
                };
                let at = out
                    .iter()
                    .position(|w| w.key == full)
                    .ok_or_else(|| CardError::UnknownTarget {
                        source_ref: self.sources.describe(&node.source, target),
                        target: target.clone(),
                    })?;
                let base = out.remove(at);

                let expansions: Vec<WidgetInstruction> = combos
                    .iter()
                    .enumerate()
                    .map(|(k, idx)| {
                        let mut scope = args.clone();
                        for (d, var) in vars.iter().enumerate() {
                            scope.insert(var.clone(), Value::String(ranges[d][idx[d]].clone()));
                        }
                        let mut data = base.data.clone();
                        for (field, templates) in fields {
                            let template = &templates[k % templates.len()];
                            Update::parse(field, template.clone())
                                .bind(&scope)
                                .apply(&mut data);
                        }
                        let suffix = idx.iter().map(usize::to_string).collect::<Vec<_>>();
                        WidgetInstruction {
                            key: format!("{}[{}]", base.key, suffix.join(",")),
                            tag: type_of(&data),
                            data,
                            position: base.position,
                            array_position: base
                                .array_position
                                .iter()
                                .chain(idx)
                                .copied()
                                .collect(),
                        }
                    })
                    .collect();
                let tail = out.split_off(at);
                out.extend(expansions);
                out.extend(tail);
            }
        }
        Ok(())
    }
}

fn type_of(data: &Map<String, Value>) -> String {
    data.get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// `[a:b]` inclusive integers, or a comma list (brackets optional).
pub(crate) fn parse_range(expr: &str) -> Result<Vec<String>, String> {
    let s = expr.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(s);

    if let Some((start, end)) = inner.split_once(':') {
        let bound = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| format!("range {expr} needs integer bounds"))
        };
        let (start, end) = (bound(start)?, bound(end)?);
        if end < start {
            return Err(format!("range {expr} ends before it starts"));
        }
        if end.abs_diff(start) >= MAX_GENERATED as u64 {
            return Err(format!("range {expr} is larger than {MAX_GENERATED}"));
        }
        return Ok((start..=end).map(|v| v.to_string()).collect());
    }

    let items: Vec<String> = inner
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(format!("range {expr} is empty"));
    }
    Ok(items)
}

/// Index tuples of the cartesian product, first dimension outermost.
pub(crate) fn combinations(ranges: &[Vec<String>]) -> Result<Vec<Vec<usize>>, String> {
    let total = ranges
        .iter()
        .try_fold(1usize, |acc, r| acc.checked_mul(r.len()))
        .filter(|&n| n <= MAX_GENERATED)
        .ok_or_else(|| format!("rule generates more than {MAX_GENERATED} widgets"))?;

    let mut out = Vec::with_capacity(total);
    let mut idx = vec![0usize; ranges.len()];
    for _ in 0..total {
        out.push(idx.clone());
        for d in (0..idx.len()).rev() {
            idx[d] += 1;
            if idx[d] < ranges[d].len() {
                break;
            }
            idx[d] = 0;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/factory/frame.rs"]
mod tests;
