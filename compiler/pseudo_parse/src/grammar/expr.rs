//! Expression parsing.
//!
//! Binary operators use precedence climbing over
//! [`BinaryOperator::precedence`]. Unary operators bind to a single primary
//! or right-hand operand, so `-a + b` is `(-a) + b`.
//!
//! A missing right operand becomes an `EmptyExpression` rather than an
//! error; the runtime evaluates it to `null`.

use pseudo_ir::{
    BinaryOperator, Keyword, LiteralValue, MapField, Node, NodeKind, Position, Punct, TokenKind,
    UnaryOperator,
};
use pseudo_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{PResult, ParseError, Parser};

impl Parser {
    /// Parse an expression, or `None` if the current token cannot start one.
    pub(crate) fn parse_expression(&mut self) -> PResult<Option<Node>> {
        self.parse_sub_expression(0)
    }

    /// Parse an expression that must be present.
    pub(crate) fn parse_expected_expression(&mut self) -> PResult<Node> {
        match self.parse_expression()? {
            Some(expression) => Ok(expression),
            None => {
                let err = ParseError::unexpected_expression(self.token());
                self.raise(err)
            }
        }
    }

    pub(crate) fn parse_sub_expression(&mut self, min_precedence: u8) -> PResult<Option<Node>> {
        ensure_sufficient_stack(|| self.parse_sub_expression_inner(min_precedence))
    }

    fn parse_sub_expression_inner(&mut self, min_precedence: u8) -> PResult<Option<Node>> {
        let expression = if let Some(operator) = UnaryOperator::from_token(self.token()) {
            self.parse_unary(operator)?
        } else {
            match self.parse_primary()? {
                Some(primary) => primary,
                None => match self.parse_righthand()? {
                    Some(righthand) => righthand,
                    None => return Ok(None),
                },
            }
        };

        self.parse_binary(expression, min_precedence).map(Some)
    }

    fn parse_unary(&mut self, operator: UnaryOperator) -> PResult<Node> {
        let start = self.token().start;
        self.next()?;

        let argument = match self.parse_primary()? {
            Some(primary) => primary,
            None => match self.parse_righthand()? {
                Some(righthand) => righthand,
                None => Node::empty(self.token().start, self.token().end),
            },
        }
        .boxed();

        let kind = match operator {
            UnaryOperator::Neg | UnaryOperator::Plus => {
                NodeKind::BinaryNegatedExpression { operator, argument }
            }
            UnaryOperator::Not => NodeKind::NegationExpression { argument },
            UnaryOperator::New => NodeKind::UnaryExpression { operator, argument },
        };
        Ok(Node::new(kind, start, self.previous().end))
    }

    /// Fold binary operators binding tighter than `min_precedence` onto
    /// `left`.
    pub(crate) fn parse_binary(&mut self, mut left: Node, min_precedence: u8) -> PResult<Node> {
        while let Some(operator) = BinaryOperator::from_token(self.token()) {
            let mut precedence = operator.precedence();
            if precedence <= min_precedence {
                break;
            }
            if operator.is_right_associative() {
                precedence -= 1;
            }
            self.next()?;

            let right = match self.parse_sub_expression(precedence)? {
                Some(right) => right,
                None => Node::empty(self.token().start, self.token().end),
            };

            let start = left.start;
            let (left_box, right_box) = (left.boxed(), right.boxed());
            let kind = if operator.is_logical() {
                NodeKind::LogicalExpression {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            } else {
                NodeKind::BinaryExpression {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            };
            left = Node::new(kind, start, self.previous().end);
        }
        Ok(left)
    }

    /// Literals, `.5` floats, anonymous functions, and map/list constructors.
    fn parse_primary(&mut self) -> PResult<Option<Node>> {
        let start = self.token().start;

        if self.token().is_literal() {
            let is_nil = self.token().kind == TokenKind::NilLiteral;
            let literal = self.parse_literal()?;
            if !is_nil && self.token().is_punct(Punct::Dot) {
                return self.parse_righthand_greedy(literal).map(Some);
            }
            return Ok(Some(literal));
        }

        let kind = self.token().kind;
        match kind {
            TokenKind::Punct(Punct::Dot) => {
                if self.cursor.peek()?.kind == TokenKind::NumericLiteral {
                    return self.parse_float(start).map(Some);
                }
                Ok(None)
            }
            TokenKind::Keyword(Keyword::Function) => {
                self.next()?;
                self.parse_function_declaration(start).map(Some)
            }
            TokenKind::Punct(Punct::LeftBrace) => {
                self.next()?;
                let map = self.parse_map_constructor(start)?;
                self.parse_righthand_greedy(map).map(Some)
            }
            TokenKind::Punct(Punct::LeftBracket) => {
                self.next()?;
                let list = self.parse_list_constructor(start)?;
                self.parse_righthand_greedy(list).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Convert the current literal token and advance past it.
    fn parse_literal(&mut self) -> PResult<Node> {
        let token = self.token();
        let (value, raw) = match token.kind {
            TokenKind::BooleanLiteral => (
                LiteralValue::Boolean(token.value == "true"),
                token.value.clone(),
            ),
            TokenKind::NumericLiteral => (
                LiteralValue::Number(token.value.parse().unwrap_or(f64::NAN)),
                token.value.clone(),
            ),
            TokenKind::StringLiteral => (
                LiteralValue::String(token.value.clone()),
                format!("\"{}\"", token.value.replace('"', "\"\"")),
            ),
            _ => (LiteralValue::Nil, token.value.clone()),
        };
        let node = Node::new(NodeKind::Literal { value, raw }, token.start, token.end);
        self.next()?;
        Ok(node)
    }

    /// `.5` reads as `0.5`.
    fn parse_float(&mut self, start: Position) -> PResult<Node> {
        self.next()?;
        let raw = format!("0.{}", self.token().value);
        let value = raw.parse().unwrap_or(f64::NAN);
        let end = self.token().end;
        self.next()?;
        Ok(Node::new(
            NodeKind::Literal {
                value: LiteralValue::Number(value),
                raw,
            },
            start,
            end,
        ))
    }

    /// An identifier, or a parenthesized expression, followed by any number
    /// of member/index/call suffixes.
    pub(crate) fn parse_righthand(&mut self) -> PResult<Option<Node>> {
        let kind = self.token().kind;
        let origin = match kind {
            TokenKind::Identifier => self.parse_identifier()?,
            TokenKind::Punct(Punct::LeftParen) => {
                self.next()?;
                let expression = self.parse_expected_expression()?;
                self.expect_punct(Punct::RightParen)?;
                expression
            }
            _ => return Ok(None),
        };
        self.parse_righthand_greedy(origin).map(Some)
    }

    /// Apply suffixes (`.name`, `[index]`, `(args)`, `+= value`) to `origin`
    /// until none follows.
    pub(crate) fn parse_righthand_greedy(&mut self, mut origin: Node) -> PResult<Node> {
        loop {
            let TokenKind::Punct(punct) = self.token().kind else {
                return Ok(origin);
            };
            let compound = punct.compound_operator().and_then(BinaryOperator::from_punct);
            if let Some(operator) = compound {
                self.next()?;
                origin = self.parse_compound_assignment(origin, operator)?;
                continue;
            }
            origin = match punct {
                Punct::LeftBracket => {
                    self.next()?;
                    self.parse_index(origin)?
                }
                Punct::Dot => {
                    self.next()?;
                    let identifier = self.parse_identifier()?;
                    let start = origin.start;
                    Node::new(
                        NodeKind::MemberExpression {
                            origin: origin.boxed(),
                            identifier: identifier.boxed(),
                        },
                        start,
                        self.previous().end,
                    )
                }
                Punct::LeftParen => self.parse_call(origin)?,
                _ => return Ok(origin),
            };
        }
    }

    /// `a += b` becomes `a = a + b`.
    fn parse_compound_assignment(
        &mut self,
        origin: Node,
        operator: BinaryOperator,
    ) -> PResult<Node> {
        let value_start = self.token().start;
        let value = match self.parse_sub_expression(0)? {
            Some(value) => value,
            None => Node::empty(self.token().start, self.token().end),
        };
        let end = self.previous().end;

        let init = Node::new(
            NodeKind::BinaryExpression {
                operator,
                left: origin.clone().boxed(),
                right: value.boxed(),
            },
            value_start,
            end,
        );
        let start = origin.start;
        Ok(Node::new(
            NodeKind::AssignmentStatement {
                variable: origin.boxed(),
                init: init.boxed(),
            },
            start,
            end,
        ))
    }

    fn parse_index(&mut self, origin: Node) -> PResult<Node> {
        let index = self.parse_expected_expression()?;
        self.expect_punct(Punct::RightBracket)?;
        let start = origin.start;
        Ok(Node::new(
            NodeKind::IndexExpression {
                origin: origin.boxed(),
                index: index.boxed(),
            },
            start,
            self.previous().end,
        ))
    }

    fn parse_call(&mut self, origin: Node) -> PResult<Node> {
        if self.token().line() != self.previous().line() {
            let err = ParseError::call_expression_eol(self.token(), self.previous());
            return self.raise(err);
        }
        self.next()?;

        let mut arguments = Vec::new();
        if let Some(argument) = self.parse_expression()? {
            arguments.push(argument);
            while self.cursor.consume_punct(Punct::Comma)? {
                arguments.push(self.parse_expected_expression()?);
            }
        }
        self.expect_punct(Punct::RightParen)?;

        trace!(arguments = arguments.len(), "call expression");
        let start = origin.start;
        Ok(Node::new(
            NodeKind::CallExpression {
                origin: origin.boxed(),
                arguments,
            },
            start,
            self.previous().end,
        ))
    }

    pub(crate) fn parse_identifier(&mut self) -> PResult<Node> {
        if self.token().kind != TokenKind::Identifier {
            let err = ParseError::unexpected_identifier(self.token());
            return self.raise(err);
        }
        let token = self.token();
        let name = token.value.clone();
        let (start, end) = (token.start, token.end);
        self.record_namespace(&name);
        self.next()?;
        Ok(Node::new(NodeKind::Identifier { name }, start, end))
    }

    /// Entries are `"key": value`, separated by commas or line breaks.
    fn parse_map_constructor(&mut self, start: Position) -> PResult<Node> {
        let mut fields = Vec::new();

        loop {
            if self.token().kind == TokenKind::StringLiteral {
                let key = self.token().value.clone();
                let key_start = self.token().start;
                self.next()?;
                self.expect_punct(Punct::Colon)?;
                let value = self.parse_expected_expression()?;
                let end = value.end;
                fields.push(MapField {
                    key,
                    value,
                    start: key_start,
                    end,
                });
            }

            if self.cursor.consume_punct(Punct::RightBrace)? {
                break;
            }
            if self.token().is_punct(Punct::Comma) || self.token().is_eol() {
                self.next()?;
                continue;
            }
            let err = ParseError::unexpected_value(self.token(), Punct::RightBrace.as_str());
            self.raise(err)?;
            break;
        }

        Ok(Node::new(
            NodeKind::MapConstructorExpression { fields },
            start,
            self.previous().end,
        ))
    }

    /// Elements are separated by commas or line breaks.
    fn parse_list_constructor(&mut self, start: Position) -> PResult<Node> {
        let mut fields = Vec::new();

        loop {
            if let Some(value) = self.parse_expression()? {
                fields.push(value);
            }
            if self.token().is_punct(Punct::Comma) || self.token().is_eol() {
                self.next()?;
                continue;
            }
            break;
        }
        self.expect_punct(Punct::RightBracket)?;

        Ok(Node::new(
            NodeKind::ListConstructorExpression { fields },
            start,
            self.previous().end,
        ))
    }
}
